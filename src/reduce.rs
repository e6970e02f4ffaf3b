//! Influence reduction: fold removed influences into retained ones
//!
//! Building a reduced level-of-detail skeleton removes joints; every
//! removed joint's weight mass must land on a joint that survives, or the
//! mesh would lose deformation. The reducer moves mass, never creates or
//! destroys it, so a record that satisfied the sum-to-one invariant still
//! satisfies it afterwards with no renormalization pass.

use std::collections::HashSet;

use crate::{
    error::{Error, Result},
    record::WeightRecord,
};

/// Mapping from a retained influence to the influences folded into it
///
/// Used only in memory; a transfer spec is never persisted.
#[derive(Debug, Clone, Default)]
pub struct TransferSpec {
    entries: Vec<(String, Vec<String>)>,
}

impl TransferSpec {
    /// Create a new empty transfer spec
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fold `removed` influences into `retained`
    pub fn fold<S: Into<String>, I, R>(&mut self, retained: S, removed: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.entries.push((
            retained.into(),
            removed.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Iterate `(retained, removed)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(retained, removed)| (retained.as_str(), removed.as_slice()))
    }

    /// Check if the spec folds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, removed)| removed.is_empty())
    }

    /// Validate the whole spec against a record before any mutation
    fn validate(&self, record: &WeightRecord) -> Result<()> {
        let retained_names: HashSet<&str> = self
            .entries
            .iter()
            .map(|(retained, _)| retained.as_str())
            .collect();

        let mut removed_names = HashSet::new();
        for (retained, removed) in &self.entries {
            if record.influence_weights(retained).is_none() {
                return Err(Error::missing_influence(retained.clone()));
            }
            for name in removed {
                if retained_names.contains(name.as_str()) {
                    return Err(Error::cyclic_transfer_spec(name.clone()));
                }
                if !removed_names.insert(name.as_str()) {
                    return Err(Error::invalid_parameter(format!(
                        "influence {name} is removed twice"
                    )));
                }
                if record.influence_weights(name).is_none() {
                    return Err(Error::missing_influence(name.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Fold removed influences' weight mass into their retained targets
///
/// For every `(retained, removed)` pair and vertex `v`, adds
/// `Σ weights[removed_k][v]` onto `weights[retained][v]`, then deletes the
/// removed influences from the record. The whole spec is validated first;
/// on any error the record is untouched.
pub fn reduce(record: &mut WeightRecord, spec: &TransferSpec) -> Result<()> {
    spec.validate(record)?;

    for (retained, removed) in spec.entries() {
        for name in removed {
            let row = record.take_row(name).ok_or_else(|| {
                Error::missing_influence(name.clone())
            })?;
            let target = record.row_mut(retained).ok_or_else(|| {
                Error::missing_influence(retained.to_string())
            })?;
            for (sum, mass) in target.iter_mut().zip(&row) {
                *sum += mass;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attributes::BindAttributes, deformer::WeightMatrix};

    fn hand_record() -> WeightRecord {
        let matrix = WeightMatrix::new(
            vec!["hand".into(), "finger1".into(), "finger2".into()],
            vec![
                vec![0.6, 0.2, 1.0],
                vec![0.3, 0.5, 0.0],
                vec![0.1, 0.3, 0.0],
            ],
        )
        .unwrap();
        WeightRecord::new(
            "handShape",
            "skinCluster1",
            matrix,
            vec![0.0; 3],
            BindAttributes::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_mass_conservation() {
        let mut record = hand_record();
        let mut spec = TransferSpec::new();
        spec.fold("hand", ["finger1", "finger2"]);

        reduce(&mut record, &spec).unwrap();

        assert_eq!(record.influences(), ["hand"]);
        assert_eq!(
            record.influence_weights("hand"),
            Some([1.0, 1.0, 1.0].as_slice())
        );
        assert!(record.influence_weights("finger1").is_none());
        assert!(record.influence_weights("finger2").is_none());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_partial_fold_keeps_other_influences() {
        let mut record = hand_record();
        let mut spec = TransferSpec::new();
        spec.fold("hand", ["finger2"]);

        reduce(&mut record, &spec).unwrap();

        assert_eq!(record.influences(), ["hand", "finger1"]);
        assert_eq!(
            record.influence_weights("hand"),
            Some([0.7, 0.5, 1.0].as_slice())
        );
        assert_eq!(
            record.influence_weights("finger1"),
            Some([0.3, 0.5, 0.0].as_slice())
        );
    }

    #[test]
    fn test_cycle_is_rejected_without_mutation() {
        let mut record = hand_record();
        let before = record.clone();

        let mut spec = TransferSpec::new();
        spec.fold("hand", ["finger1"]);
        spec.fold("finger1", ["finger2"]);

        let result = reduce(&mut record, &spec);
        assert!(matches!(result, Err(Error::CyclicTransferSpec { .. })));
        assert_eq!(record, before);
    }

    #[test]
    fn test_unknown_influence_is_rejected_without_mutation() {
        let mut record = hand_record();
        let before = record.clone();

        let mut spec = TransferSpec::new();
        spec.fold("hand", ["thumb"]);

        let result = reduce(&mut record, &spec);
        assert!(matches!(result, Err(Error::MissingInfluence { .. })));
        assert_eq!(record, before);
    }

    #[test]
    fn test_double_removal_is_rejected() {
        let mut record = hand_record();

        let mut spec = TransferSpec::new();
        spec.fold("hand", ["finger1"]);
        spec.fold("finger2", ["finger1"]);

        assert!(reduce(&mut record, &spec).is_err());
    }
}
