//! Caller-owned skeleton cache
//!
//! Extraction walks the whole hierarchy, so the last result is kept and
//! handed out again while the same object stays selected. The cache holds a
//! single entry keyed by [`ObjectId`]; asking for another object replaces it.
//!
//! All access goes through `&mut self`. Callers that share a cache between
//! threads wrap it in a `Mutex`.

use std::sync::Arc;

use crate::error::Result;
use crate::object::{ObjectId, SceneObject};
use crate::skeleton::{Skeleton, SkeletonExtractor};

#[derive(Debug, Default)]
pub struct SkeletonCache {
    entry: Option<(ObjectId, Arc<Skeleton>)>,
}

impl SkeletonCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached skeleton for `object`, extracting it on a miss
    ///
    /// A failed extraction leaves the cache empty.
    pub fn get_or_compute(
        &mut self,
        object: &SceneObject,
        extractor: &SkeletonExtractor,
    ) -> Result<Arc<Skeleton>> {
        if let Some((id, skeleton)) = &self.entry {
            if *id == object.id {
                log::debug!("Using cached target skeleton for {}", object.id);
                return Ok(Arc::clone(skeleton));
            }
            log::debug!("Active object changed from {} to {}", id, object.id);
        }

        self.invalidate();
        log::debug!("Loading target skeleton for {}", object.id);
        let skeleton = Arc::new(extractor.extract(object)?);
        self.entry = Some((object.id, Arc::clone(&skeleton)));
        Ok(skeleton)
    }

    /// Drop the cached entry
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Identity of the object the cached skeleton belongs to
    pub fn cached_id(&self) -> Option<ObjectId> {
        self.entry.as_ref().map(|(id, _)| *id)
    }
}
