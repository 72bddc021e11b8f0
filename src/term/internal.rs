use crate::term::{GoGroup, GoTermId, Namespace};
use crate::{DEFAULT_NUM_ALL_PARENTS, DEFAULT_NUM_PARENTS};

/// The owned term data stored inside the ontology arena
///
/// `all_parents` and `depth` are empty/unset until
/// [`Ontology::create_cache`](`crate::Ontology::create_cache`) ran.
#[derive(Debug)]
pub(crate) struct GoTermInternal {
    id: GoTermId,
    name: String,
    namespace: Namespace,
    parents: GoGroup,
    all_parents: GoGroup,
    depth: Option<u32>,
}

impl GoTermInternal {
    pub fn new(id: GoTermId, name: &str, namespace: Namespace) -> GoTermInternal {
        GoTermInternal {
            id,
            name: name.to_string(),
            namespace,
            parents: GoGroup::with_capacity(DEFAULT_NUM_PARENTS),
            all_parents: GoGroup::with_capacity(DEFAULT_NUM_ALL_PARENTS),
            depth: None,
        }
    }

    pub fn id(&self) -> GoTermId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn parents(&self) -> &GoGroup {
        &self.parents
    }

    pub fn all_parents(&self) -> &GoGroup {
        &self.all_parents
    }

    pub fn all_parents_mut(&mut self) -> &mut GoGroup {
        &mut self.all_parents
    }

    /// `0` for roots; only meaningful once the cache was created
    pub fn depth(&self) -> u32 {
        self.depth.unwrap_or(0)
    }

    pub fn depth_cached(&self) -> bool {
        self.depth.is_some()
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.depth = Some(depth);
    }

    /// A term without parents needs no ancestor cache
    pub fn parents_cached(&self) -> bool {
        if self.parents.is_empty() {
            true
        } else {
            !self.all_parents.is_empty()
        }
    }

    pub fn add_parent(&mut self, parent_id: GoTermId) {
        self.parents.insert(parent_id);
    }
}

impl PartialEq for GoTermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTermInternal {}
