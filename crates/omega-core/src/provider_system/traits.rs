use async_trait::async_trait;

use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;

/// Core trait that all service providers implement
///
/// Both hooks are optional. `bind` runs for every provider in declaration
/// order and is where services get registered; `boot` runs afterwards, once
/// every provider has bound, for work that needs other providers' services.
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    /// The name of the provider, used in logs and errors
    fn name(&self) -> &str;

    /// Register services with the application.
    fn bind(&self, _app: &mut Application) -> Result<()> {
        Ok(())
    }

    /// Called after all providers have bound.
    async fn boot(&self, _app: &Application) -> Result<()> {
        Ok(())
    }
}
