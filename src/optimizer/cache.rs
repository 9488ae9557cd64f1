use crate::combat::CombatScenario;
use crate::dps::DpsModel;
use crate::stats::StatSnapshot;
use std::collections::HashMap;

/// Memo of DPS totals for one ranking request, keyed by snapshot content.
/// Many outcomes across axes produce identical stat totals; each is only
/// evaluated once.
pub struct DpsCache<'a, M: DpsModel> {
    model: &'a M,
    scenario: CombatScenario,
    totals: HashMap<[u8; 32], f64>,
    hits: u64,
}

impl<'a, M: DpsModel> DpsCache<'a, M> {
    pub fn new(model: &'a M, scenario: CombatScenario) -> Self {
        Self {
            model,
            scenario,
            totals: HashMap::new(),
            hits: 0,
        }
    }

    pub fn total(&mut self, snapshot: &StatSnapshot) -> f64 {
        let key = snapshot.fingerprint();
        if let Some(&total) = self.totals.get(&key) {
            self.hits += 1;
            return total;
        }
        let total = self.model.total(snapshot, &self.scenario);
        self.totals.insert(key, total);
        total
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatMode;
    use crate::dps::StandardDpsModel;
    use crate::stats::StatKind;

    #[test]
    fn test_same_content_hits() {
        let model = StandardDpsModel::new();
        let mut cache = DpsCache::new(&model, CombatMode::Stage.scenario());
        assert!(cache.is_empty());
        let mut a = StatSnapshot::new();
        a.add("base", StatKind::AttackFlat, 1000.0);
        let mut b = StatSnapshot::new();
        b.add("other", StatKind::AttackFlat, 1000.0);

        let x = cache.total(&a);
        let y = cache.total(&b);
        assert_eq!(x, y);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }
}
