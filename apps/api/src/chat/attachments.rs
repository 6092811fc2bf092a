//! In-process attachment blob store.
//!
//! Uploaded files are held in memory under a locally resolvable URL and
//! released in one sweep when the session is torn down, mirroring the
//! acquire-then-release-on-unmount lifecycle of browser object URLs.

use std::collections::HashMap;

use bytes::Bytes;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredAttachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct AttachmentStore {
    blobs: HashMap<Uuid, StoredAttachment>,
}

impl AttachmentStore {
    /// Stores a blob and returns its id and resolvable URL.
    pub fn insert(&mut self, name: &str, mime_type: &str, bytes: Bytes) -> (Uuid, String) {
        let id = Uuid::new_v4();
        self.blobs.insert(
            id,
            StoredAttachment {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                bytes,
            },
        );
        (id, format!("/attachments/{id}"))
    }

    pub fn get(&self, id: Uuid) -> Option<&StoredAttachment> {
        self.blobs.get(&id)
    }

    /// Drops every blob. Called at session teardown; individual attachments
    /// are never removed mid-life (no message deletion exists).
    pub fn release_all(&mut self) {
        self.blobs.clear();
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut store = AttachmentStore::default();
        let (id, url) = store.insert("cv.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        assert_eq!(url, format!("/attachments/{id}"));
        let blob = store.get(id).unwrap();
        assert_eq!(blob.name, "cv.pdf");
        assert_eq!(blob.mime_type, "application/pdf");
        assert_eq!(blob.bytes.as_ref(), b"%PDF");
    }

    #[test]
    fn test_release_all() {
        let mut store = AttachmentStore::default();
        store.insert("a.txt", "text/plain", Bytes::from_static(b"a"));
        store.insert("b.txt", "text/plain", Bytes::from_static(b"b"));
        assert_eq!(store.len(), 2);
        store.release_all();
        assert!(store.is_empty());
    }
}
