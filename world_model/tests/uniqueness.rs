//! Property tests for the one-triple-per-key invariant of the fact store.

use std::collections::HashSet;

use proptest::prelude::*;
use world_model::{Effect, Relation, Universe};

const NOUNS: [&str; 3] = ["GEORGE", "MARTHA", "DOG"];
const RELATIONS: [&str; 2] = ["LIKES", "FEARS"];

fn effect() -> impl Strategy<Value = Effect> {
    (0..NOUNS.len(), 0..RELATIONS.len(), prop::option::of(0..NOUNS.len()), any::<bool>()).prop_map(
        |(subject, relation, object, negate)| {
            let mut relation = Relation::new(RELATIONS[relation]);
            relation.negate = negate;
            Effect::new(NOUNS[subject], relation, object.map(|o| NOUNS[o].to_string()))
        },
    )
}

proptest! {
    #[test]
    fn network_never_holds_duplicate_keys(ticks in prop::collection::vec(prop::collection::vec(effect(), 0..12), 1..8)) {
        let mut universe = Universe::new(1700).unwrap();

        for effects in ticks {
            universe.snapshot();
            universe.advance_clock(10);
            universe.queue(effects.clone());
            universe.apply_pending();

            let keys: HashSet<_> = universe.network().map(|t| t.key()).collect();
            prop_assert_eq!(keys.len(), universe.fact_count());

            // The last effect for a key decides whether the fact survives the tick.
            let mut decided = HashSet::new();
            for last in effects.iter().rev() {
                if !decided.insert((&last.subject, &last.relation.name, &last.object)) {
                    continue;
                }
                let present = universe
                    .get(&last.subject, &last.relation.name, last.object.as_deref())
                    .is_some();
                prop_assert_eq!(present, !last.relation.negate);
            }
        }

        for snapshot in universe.history().values() {
            let ids: HashSet<_> = snapshot.iter().map(|t| t.key()).collect();
            prop_assert_eq!(ids.len(), snapshot.len());
        }
    }

    #[test]
    fn negated_sentence_matches_iff_fact_absent(subject in 0..NOUNS.len(), object in 0..NOUNS.len(), assert_first in any::<bool>()) {
        let mut universe = Universe::new(1700).unwrap();
        if assert_first {
            universe.assert_fact(NOUNS[subject], "LIKES", Some(NOUNS[object]));
        }
        universe.queue(vec![Effect::new(
            NOUNS[subject],
            Relation::new("LIKES").negated(),
            Some(NOUNS[object].to_string()),
        )]);
        universe.apply_pending();

        prop_assert_eq!(universe.fact_count(), 0);
        prop_assert!(universe.matches(NOUNS[subject], &Relation::new("LIKES").negated(), Some(NOUNS[object])));
    }
}
