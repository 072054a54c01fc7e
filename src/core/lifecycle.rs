use crate::core::store::EntityStore;
use crate::domain::model::OffspringState;
use crate::utils::error::{LitterbookError, Result};
use std::sync::Arc;

/// Enforces the offspring state machine on top of [`EntityStore`].
///
/// Four reachable states: alive-unweaned (initial), alive-weaned,
/// dead-unweaned, dead-weaned. Both dead states are terminal. Every
/// transition runs as one atomic conditional update: the precondition is
/// checked under the same write guard that applies the mutation, so a
/// concurrent weaning and death cannot interleave into a weaning that lands
/// after the death committed.
pub struct LifecycleManager {
    store: Arc<EntityStore>,
}

impl LifecycleManager {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Marks an offspring as having survived to weaning.
    ///
    /// Succeeds as a no-op when the offspring is alive and already weaned
    /// (safe to retry verbatim). Fails with `InvalidState` once the
    /// offspring is dead, regardless of its weaning history. The flag is
    /// sticky: nothing ever resets it.
    pub async fn record_weaning(&self, offspring_id: &str) -> Result<()> {
        self.store
            .mutate_offspring(offspring_id, |offspring| {
                if !offspring.is_alive {
                    return Err(LitterbookError::invalid_state(format!(
                        "offspring {} is not alive, cannot record weaning",
                        offspring.id
                    )));
                }
                offspring.survived_till_weaning = true;
                Ok(())
            })
            .await?;
        tracing::debug!(offspring_id, "Recorded weaning");
        Ok(())
    }

    /// Marks an offspring as dead. Death is terminal; recording it twice
    /// fails. `survived_till_weaning` is never touched here.
    pub async fn record_death(&self, offspring_id: &str) -> Result<()> {
        self.store
            .mutate_offspring(offspring_id, |offspring| {
                if !offspring.is_alive {
                    return Err(LitterbookError::invalid_state(format!(
                        "offspring {} is already dead",
                        offspring.id
                    )));
                }
                offspring.is_alive = false;
                Ok(())
            })
            .await?;
        tracing::debug!(offspring_id, "Recorded death");
        Ok(())
    }

    pub async fn state_of(&self, offspring_id: &str) -> Result<OffspringState> {
        self.store
            .get_offspring(offspring_id)
            .await
            .map(|o| o.state())
            .ok_or_else(|| LitterbookError::not_found("offspring", offspring_id))
    }
}
