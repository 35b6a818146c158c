use crate::backend::DocumentService;

/// Shared store handle passed across crates. Owns the per-user key schema so
/// the operation modules never concatenate raw keys themselves.
#[derive(Clone, Debug)]
pub struct Store {
    docs: DocumentService,
}

impl Store {
    /// Create a store handle from an existing document service.
    pub fn new(docs: DocumentService) -> Self {
        Self { docs }
    }

    /// In-memory store for tests and local runs.
    pub fn memory() -> Self {
        Self::new(DocumentService::memory("tipoff:test"))
    }

    /// Expose the document service for operation modules.
    pub fn docs(&self) -> &DocumentService {
        &self.docs
    }

    /// Main profile hash: `name`, `email`, `coins`, `points`, `level`, `xp`,
    /// `friendCode`, `avatarId`.
    pub fn user_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}"))
    }

    pub fn avatars_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}:avatars"))
    }

    /// Levels whose rewards were already granted, stored as decimal strings.
    pub fn claimed_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}:claimed"))
    }

    pub fn friends_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}:friends"))
    }

    pub fn requests_in_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}:requests:in"))
    }

    pub fn requests_out_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}:requests:out"))
    }

    /// Append-only game history, one JSON record per entry.
    pub fn history_key(&self, user_id: &str) -> String {
        self.docs.key(format!("user:{user_id}:history"))
    }

    /// Friend-code index entry mapping an (uppercase) code to a user id.
    pub fn code_key(&self, normalized_code: &str) -> String {
        self.docs.key(format!("code:{normalized_code}"))
    }
}
