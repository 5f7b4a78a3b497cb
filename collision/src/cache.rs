use crate::{mask::Mask, source::SourceId};
use std::{collections::HashMap, rc::Rc};

/// Masks keyed by the identity of the source they were built from.
///
/// Entries live until [`MaskCache::clear`] is called, there is no automatic
/// eviction.
#[derive(Debug, Default)]
pub struct MaskCache {
    masks: HashMap<SourceId, Rc<Mask>>,
}

impl MaskCache {
    pub fn new() -> Self {
        MaskCache {
            masks: HashMap::new(),
        }
    }

    pub fn get(&self, id: SourceId) -> Option<Rc<Mask>> {
        self.masks.get(&id).cloned()
    }

    pub fn put(&mut self, id: SourceId, mask: Rc<Mask>) {
        self.masks.insert(id, mask);
    }

    pub fn clear(&mut self) {
        log::debug!("Cleared {} cached masks", self.masks.len());
        self.masks.clear();
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
