use crate::domain::model::{
    Litter, LitterUpdate, Mother, Offspring, OffspringUpdate, Report, Sex,
};
use crate::utils::error::{LitterbookError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Canonical keyed storage for mothers, litters, offspring, and reports.
///
/// All tables live behind a single `RwLock`; one write guard is the
/// transactional scope for every mutating operation, so a precondition
/// checked under the guard still holds when the write lands. Foreign keys
/// are plain identifier strings resolved by lookup, never live references.
pub struct EntityStore {
    state: RwLock<StoreState>,
    auto_register_mothers: bool,
}

#[derive(Default)]
pub(crate) struct StoreState {
    pub(crate) mothers: HashMap<String, Mother>,
    pub(crate) litters: HashMap<String, Litter>,
    pub(crate) offspring: HashMap<String, Offspring>,
    pub(crate) reports: HashMap<String, Report>,
    next_litter_seq: u64,
}

impl StoreState {
    fn next_litter_id(&mut self) -> String {
        self.next_litter_seq += 1;
        format!("litter-{:06}", self.next_litter_seq)
    }

    /// True when another litter already occupies the given
    /// (mother, father, birth date) triple.
    fn litter_triple_taken(
        &self,
        mother_id: &str,
        father_id: Option<&str>,
        birth_date: NaiveDate,
        exclude_litter: Option<&str>,
    ) -> bool {
        self.litters.values().any(|l| {
            Some(l.id.as_str()) != exclude_litter
                && l.mother_id == mother_id
                && l.father_id.as_deref() == father_id
                && l.birth_date == birth_date
        })
    }
}

fn triple_label(mother_id: &str, father_id: Option<&str>, birth_date: NaiveDate) -> String {
    format!(
        "({}, {}, {})",
        mother_id,
        father_id.unwrap_or("-"),
        birth_date
    )
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            auto_register_mothers: false,
        }
    }

    /// Variant that registers unknown mothers on the fly when a litter is
    /// recorded against them, instead of failing the precondition.
    pub fn with_auto_register() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            auto_register_mothers: true,
        }
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().await
    }

    pub async fn add_mother(&self, id: &str) -> Result<()> {
        let mut state = self.write().await;
        if state.mothers.contains_key(id) {
            return Err(LitterbookError::already_exists("mother", id));
        }
        state.mothers.insert(
            id.to_string(),
            Mother {
                id: id.to_string(),
            },
        );
        tracing::debug!(mother_id = id, "Registered mother");
        Ok(())
    }

    /// Removes a mother. Litters referencing her are left untouched and
    /// simply dangle; cascading cleanup is an explicit non-goal.
    pub async fn remove_mother(&self, id: &str) -> Result<()> {
        let mut state = self.write().await;
        if state.mothers.remove(id).is_none() {
            return Err(LitterbookError::not_found("mother", id));
        }
        tracing::debug!(mother_id = id, "Removed mother");
        Ok(())
    }

    pub async fn mother_exists(&self, id: &str) -> bool {
        self.read().await.mothers.contains_key(id)
    }

    /// Records a litter and returns its generated identifier. Fails when the
    /// mother is unknown (unless auto-registration is enabled) or when a
    /// litter with the same (mother, father, birth date) triple exists.
    pub async fn record_litter(
        &self,
        mother_id: &str,
        father_id: Option<&str>,
        birth_date: NaiveDate,
        reported_litter_size: u32,
        notes: Option<&str>,
    ) -> Result<String> {
        let mut state = self.write().await;

        if !state.mothers.contains_key(mother_id) {
            if !self.auto_register_mothers {
                return Err(LitterbookError::not_found("mother", mother_id));
            }
            state.mothers.insert(
                mother_id.to_string(),
                Mother {
                    id: mother_id.to_string(),
                },
            );
            tracing::debug!(mother_id, "Auto-registered mother for new litter");
        }

        if state.litter_triple_taken(mother_id, father_id, birth_date, None) {
            return Err(LitterbookError::already_exists(
                "litter",
                triple_label(mother_id, father_id, birth_date),
            ));
        }

        let id = state.next_litter_id();
        state.litters.insert(
            id.clone(),
            Litter {
                id: id.clone(),
                mother_id: mother_id.to_string(),
                father_id: father_id.map(str::to_string),
                birth_date,
                reported_litter_size,
                notes: notes.map(str::to_string),
            },
        );
        tracing::debug!(litter_id = %id, mother_id, "Recorded litter");
        Ok(id)
    }

    /// Applies the supplied fields to an existing litter, leaving the rest
    /// unchanged. A new mother must be registered, and the updated
    /// (mother, father, birth date) triple must stay unique.
    pub async fn update_litter(&self, litter_id: &str, update: LitterUpdate) -> Result<()> {
        let mut state = self.write().await;

        let current = state
            .litters
            .get(litter_id)
            .ok_or_else(|| LitterbookError::not_found("litter", litter_id))?;

        if let Some(new_mother) = &update.mother_id {
            if !state.mothers.contains_key(new_mother) {
                return Err(LitterbookError::not_found("mother", new_mother.as_str()));
            }
        }

        let new_mother_id = update
            .mother_id
            .clone()
            .unwrap_or_else(|| current.mother_id.clone());
        let new_father_id = update
            .father_id
            .clone()
            .unwrap_or_else(|| current.father_id.clone());
        let new_birth_date = update.birth_date.unwrap_or(current.birth_date);

        let triple_changed = new_mother_id != current.mother_id
            || new_father_id != current.father_id
            || new_birth_date != current.birth_date;
        if triple_changed
            && state.litter_triple_taken(
                &new_mother_id,
                new_father_id.as_deref(),
                new_birth_date,
                Some(litter_id),
            )
        {
            return Err(LitterbookError::already_exists(
                "litter",
                triple_label(&new_mother_id, new_father_id.as_deref(), new_birth_date),
            ));
        }

        let litter = state
            .litters
            .get_mut(litter_id)
            .ok_or_else(|| LitterbookError::not_found("litter", litter_id))?;
        litter.mother_id = new_mother_id;
        litter.father_id = new_father_id;
        litter.birth_date = new_birth_date;
        if let Some(size) = update.reported_litter_size {
            litter.reported_litter_size = size;
        }
        if let Some(notes) = update.notes {
            litter.notes = notes;
        }
        tracing::debug!(litter_id, "Updated litter");
        Ok(())
    }

    pub async fn get_litter(&self, litter_id: &str) -> Option<Litter> {
        self.read().await.litters.get(litter_id).cloned()
    }

    /// Records an offspring under an existing litter. The identifier is
    /// externally supplied and must be unused; the newborn starts alive and
    /// unweaned.
    pub async fn record_offspring(
        &self,
        litter_id: &str,
        offspring_id: &str,
        sex: Sex,
        notes: Option<&str>,
    ) -> Result<()> {
        let mut state = self.write().await;

        if !state.litters.contains_key(litter_id) {
            return Err(LitterbookError::not_found("litter", litter_id));
        }
        if state.offspring.contains_key(offspring_id) {
            return Err(LitterbookError::already_exists("offspring", offspring_id));
        }

        state.offspring.insert(
            offspring_id.to_string(),
            Offspring {
                id: offspring_id.to_string(),
                litter_id: litter_id.to_string(),
                sex,
                is_alive: true,
                survived_till_weaning: false,
                notes: notes.map(str::to_string),
            },
        );
        tracing::debug!(offspring_id, litter_id, "Recorded offspring");
        Ok(())
    }

    pub async fn update_offspring(
        &self,
        offspring_id: &str,
        update: OffspringUpdate,
    ) -> Result<()> {
        let mut state = self.write().await;

        if !state.offspring.contains_key(offspring_id) {
            return Err(LitterbookError::not_found("offspring", offspring_id));
        }
        if let Some(new_litter) = &update.litter_id {
            if !state.litters.contains_key(new_litter) {
                return Err(LitterbookError::not_found("litter", new_litter.as_str()));
            }
        }

        let offspring = state
            .offspring
            .get_mut(offspring_id)
            .ok_or_else(|| LitterbookError::not_found("offspring", offspring_id))?;
        if let Some(litter_id) = update.litter_id {
            offspring.litter_id = litter_id;
        }
        if let Some(sex) = update.sex {
            offspring.sex = sex;
        }
        if let Some(notes) = update.notes {
            offspring.notes = notes;
        }
        tracing::debug!(offspring_id, "Updated offspring");
        Ok(())
    }

    pub async fn get_offspring(&self, offspring_id: &str) -> Option<Offspring> {
        self.read().await.offspring.get(offspring_id).cloned()
    }

    pub async fn get_report(&self, name: &str) -> Option<Report> {
        self.read().await.reports.get(name).cloned()
    }

    /// Atomic conditional update on one offspring: the closure sees the
    /// record under the write guard, checks its precondition, and mutates in
    /// the same critical section. This is what keeps a concurrent weaning
    /// and death from interleaving into an inconsistent state.
    pub(crate) async fn mutate_offspring<F>(&self, offspring_id: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Offspring) -> Result<()>,
    {
        let mut state = self.write().await;
        let offspring = state
            .offspring
            .get_mut(offspring_id)
            .ok_or_else(|| LitterbookError::not_found("offspring", offspring_id))?;
        mutate(offspring)
    }
}
