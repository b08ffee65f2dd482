pub(crate) mod args;
pub mod backup;
pub mod exchange;
pub mod reports;
pub mod settings;
pub mod subscriptions;
pub mod system;

use super::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(subscriptions::definitions())
        .chain(reports::definitions())
        .chain(exchange::definitions())
        .chain(backup::definitions())
        .chain(settings::definitions())
    {
        registry.register(entry);
    }
}
