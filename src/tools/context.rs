//! Tool execution context - the shared transport handle

use std::sync::Arc;

use crate::client::PharoClient;

/// Execution context handed to every tool
///
/// Built once by the entry point; cloning shares the same client.
#[derive(Debug, Clone)]
pub struct ToolContext {
    client: Arc<PharoClient>,
}

impl ToolContext {
    pub fn new(client: Arc<PharoClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PharoClient {
        &self.client
    }

    /// Shared handle, for callers that must close it on shutdown
    pub fn shared_client(&self) -> Arc<PharoClient> {
        Arc::clone(&self.client)
    }
}
