use crate::core::io::manifest::ResolvedStructure;
use crate::core::models::alignment::Alignment;
use crate::core::models::structure::StructureEntry;
use crate::engine::config::SuperposeConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::registry::{InMemoryRegistry, MappingRegistry};
use crate::engine::selector::{
    ColumnMask, SuperposeRecord, SuperposeSelection, select_superposable_columns,
};
use crate::engine::store::{AssociationStore, BindingRequest};
use crate::engine::wait::{LoadStatus, wait_for_load};
use tokio::sync::watch;
use tracing::{info, instrument};

/// A run of consecutive structure residues used as fit atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitRange {
    pub chain: Option<String>,
    pub start: isize,
    pub end: isize,
}

#[derive(Debug, Clone)]
pub struct StructureFit {
    pub entry: StructureEntry,
    pub record: SuperposeRecord,
    pub ranges: Vec<FitRange>,
}

/// Everything a viewer needs to superpose the bound structures onto the reference.
#[derive(Debug, Clone)]
pub struct SuperposePlan {
    /// Store index of the reference structure.
    pub reference: usize,
    /// Selected alignment columns, ascending.
    pub columns: Vec<usize>,
    /// Structures with a representative sequence, in store order.
    pub fits: Vec<StructureFit>,
    pub selection: SuperposeSelection,
}

impl SuperposePlan {
    /// The reference is the first resolved structure, so it leads `fits`.
    pub fn reference_fit(&self) -> Option<&StructureFit> {
        self.fits.first()
    }
}

/// Binds resolved manifest structures into `store` and registers their mappings.
///
/// A structure whose file is already bound is merged into the existing entry instead of
/// creating a second one. Mappings are registered only for sequences not already bound to
/// that entry, so binding the same manifest twice leaves both store and registry unchanged.
///
/// # Return
///
/// The structure entries that were new to the store.
pub fn bind_structures(
    store: &mut AssociationStore,
    registry: &InMemoryRegistry,
    resolved: Vec<ResolvedStructure>,
) -> Result<Vec<StructureEntry>, EngineError> {
    let mut added = Vec::new();
    for mut structure in resolved {
        let existing = store
            .index_of_file(structure.entry.file())
            .and_then(|index| store.binding(index));
        let known = existing.map(|binding| binding.sequences()).unwrap_or_default();
        if let Some(binding) = existing {
            structure.entry = binding.entry().clone();
        }

        for mapping in structure.mappings {
            if !known.contains(&mapping.sequence) {
                registry.register(structure.entry.file(), mapping)?;
            }
        }

        let request = BindingRequest::new(structure.entry, structure.sequences)
            .with_chains(structure.chains);
        added.extend(store.merge_batch([request]));
    }
    Ok(added)
}

/// Waits for every bound structure to load, then selects the common fit columns.
///
/// # Errors
///
/// - [`EngineError::StructuresNotLoaded`] if a structure file has no mappings by the deadline
/// - [`EngineError::Cancelled`] if `cancel` fires while waiting
/// - [`EngineError::NoReferenceStructure`] if no bound sequence is in the alignment
/// - [`EngineError::InsufficientColumns`] if fewer than `min_fit_columns` columns survive
#[instrument(skip_all, name = "superpose_workflow")]
pub async fn run<R: MappingRegistry + ?Sized>(
    store: &AssociationStore,
    registry: &R,
    alignment: &Alignment,
    config: &SuperposeConfig,
    reporter: &ProgressReporter<'_>,
    cancel: Option<watch::Receiver<bool>>,
) -> Result<SuperposePlan, EngineError> {
    // === Phase 1: Wait for structure mappings ===
    reporter.report(Progress::PhaseStart {
        name: "Waiting for structures",
    });
    let file_ids = store.file_ids();
    let status = wait_for_load(registry, &file_ids, &config.wait, cancel).await;
    reporter.report(Progress::PhaseFinish);
    match status {
        LoadStatus::Loaded => {}
        LoadStatus::TimedOut { unloaded } => {
            return Err(EngineError::StructuresNotLoaded { file: unloaded });
        }
        LoadStatus::Cancelled => return Err(EngineError::Cancelled),
    }

    // === Phase 2: Select superposable columns ===
    reporter.report(Progress::PhaseStart {
        name: "Selecting fit columns",
    });
    let selection = select_superposable_columns(
        store,
        registry,
        alignment,
        ColumnMask::all(alignment.width()),
    );
    reporter.report(Progress::PhaseFinish);
    let selection = selection?;

    let reference = selection.reference.ok_or(EngineError::NoReferenceStructure)?;
    let found = selection.mask.count();
    if found < config.min_fit_columns {
        return Err(EngineError::InsufficientColumns {
            found,
            required: config.min_fit_columns,
        });
    }

    // === Phase 3: Build per-structure fit ranges ===
    let fits: Vec<StructureFit> = store
        .entries()
        .zip(selection.records.iter())
        .filter(|(_, record)| !record.is_unresolved())
        .map(|(entry, record)| StructureFit {
            entry: entry.clone(),
            record: record.clone(),
            ranges: fit_ranges(record, &selection.mask),
        })
        .collect();

    reporter.report(Progress::Message(format!(
        "{} fit column(s) across {} structure(s); reference is {}",
        found,
        fits.len(),
        store
            .entry(reference)
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    )));
    info!(reference, columns = found, "Superposition plan ready.");

    Ok(SuperposePlan {
        reference,
        columns: selection.mask.columns().collect(),
        fits,
        selection,
    })
}

/// Collapses the residues a structure contributes at the selected columns into runs of
/// consecutive residue numbers.
pub fn fit_ranges(record: &SuperposeRecord, mask: &ColumnMask) -> Vec<FitRange> {
    let mut ranges: Vec<FitRange> = Vec::new();
    for residue in mask.columns().filter_map(|column| record.residue_at(column)) {
        match ranges.last_mut() {
            Some(last) if residue == last.end + 1 => last.end = residue,
            _ => ranges.push(FitRange {
                chain: record.chain.clone(),
                start: residue,
                end: residue,
            }),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::manifest::StructureManifest;
    use crate::core::models::sequence::AlignedSequence;
    use crate::engine::config::{SuperposeConfigBuilder, WaitConfig};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const MANIFEST: &str = r#"
        [[structure]]
        id = "1AAA"
        file = "1aaa.cif"

        [[structure.mapping]]
        sequence = "s1"
        chain = "A"
        first-residue = 10

        [[structure]]
        id = "2BBB"
        file = "2bbb.cif"

        [[structure.mapping]]
        sequence = "s2"
        chain = "B"
        first-residue = 1
    "#;

    fn alignment() -> Alignment {
        let mut alignment = Alignment::new();
        alignment.add_sequence(AlignedSequence::new("s1", "ACDEF-GHIK"));
        alignment.add_sequence(AlignedSequence::new("s2", "ACDEFGGHIK"));
        alignment
    }

    fn bound() -> (Alignment, AssociationStore, InMemoryRegistry) {
        let alignment = alignment();
        let resolved = StructureManifest::parse(MANIFEST)
            .unwrap()
            .resolve(&alignment)
            .unwrap();
        let mut store = AssociationStore::new();
        let registry = InMemoryRegistry::new();
        let added = bind_structures(&mut store, &registry, resolved).unwrap();
        assert_eq!(added.len(), 2);
        (alignment, store, registry)
    }

    #[test]
    fn binding_the_same_manifest_twice_changes_nothing() {
        let (alignment, mut store, registry) = bound();
        let resolved = StructureManifest::parse(MANIFEST)
            .unwrap()
            .resolve(&alignment)
            .unwrap();

        let added = bind_structures(&mut store, &registry, resolved).unwrap();

        assert!(added.is_empty());
        assert_eq!(store.len(), 2);
        assert_eq!(registry.mappings("1aaa.cif").unwrap().len(), 1);
    }

    #[test]
    fn fit_ranges_split_on_residue_breaks() {
        let (alignment, store, registry) = bound();
        let selection = select_superposable_columns(
            &store,
            &registry,
            &alignment,
            ColumnMask::all(alignment.width()),
        )
        .unwrap();

        let first = fit_ranges(&selection.records[0], &selection.mask);
        let second = fit_ranges(&selection.records[1], &selection.mask);

        assert_eq!(
            first,
            vec![FitRange {
                chain: Some("A".to_string()),
                start: 10,
                end: 18,
            }]
        );
        assert_eq!(
            second,
            vec![
                FitRange {
                    chain: Some("B".to_string()),
                    start: 1,
                    end: 5,
                },
                FitRange {
                    chain: Some("B".to_string()),
                    start: 7,
                    end: 10,
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_produces_a_plan_and_reports_phases() {
        let (alignment, store, registry) = bound();
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));

        let plan = run(&store, &registry, &alignment, &SuperposeConfig::default(), &reporter, None)
            .await
            .unwrap();

        assert_eq!(plan.reference, 0);
        assert_eq!(plan.columns, vec![0, 1, 2, 3, 4, 6, 7, 8, 9]);
        assert_eq!(plan.fits.len(), 2);
        assert_eq!(plan.fits[1].ranges.len(), 2);
        assert_eq!(plan.reference_fit().unwrap().entry.id(), "1AAA");
        assert_eq!(
            *phases.lock().unwrap(),
            vec!["Waiting for structures", "Selecting fit columns"]
        );
    }

    fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<Progress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        (reporter, events)
    }

    #[tokio::test(start_paused = true)]
    async fn run_fails_when_a_structure_never_loads() {
        let (alignment, store, _) = bound();
        let empty = InMemoryRegistry::new();
        let config = SuperposeConfig {
            wait: WaitConfig {
                base_timeout: Duration::from_millis(100),
                per_file_timeout: Duration::ZERO,
                poll_interval: Duration::from_millis(10),
            },
            ..SuperposeConfig::default()
        };

        let (reporter, events) = recording_reporter();

        let result = run(&store, &empty, &alignment, &config, &reporter, None).await;

        assert!(matches!(
            result,
            Err(EngineError::StructuresNotLoaded { file }) if file == "2bbb.cif"
        ));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Progress::PhaseStart {
                    name: "Waiting for structures"
                },
                Progress::PhaseFinish,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_enforces_minimum_fit_columns() {
        let (alignment, store, registry) = bound();
        let config = SuperposeConfigBuilder::new().min_fit_columns(20).build().unwrap();

        let result = run(&store, &registry, &alignment, &config, &ProgressReporter::new(), None).await;

        assert!(matches!(
            result,
            Err(EngineError::InsufficientColumns {
                found: 9,
                required: 20
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn run_without_bound_structures_has_no_reference() {
        let result = run(
            &AssociationStore::new(),
            &InMemoryRegistry::new(),
            &alignment(),
            &SuperposeConfig::default(),
            &ProgressReporter::new(),
            None,
        )
        .await;

        assert!(matches!(result, Err(EngineError::NoReferenceStructure)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_aborts_the_run() {
        let (alignment, store, _) = bound();
        let (cancel_tx, cancel_rx) = watch::channel(true);

        let (reporter, events) = recording_reporter();

        let result = run(
            &store,
            &InMemoryRegistry::new(),
            &alignment,
            &SuperposeConfig::default(),
            &reporter,
            Some(cancel_rx),
        )
        .await;

        drop(cancel_tx);
        assert!(matches!(result, Err(EngineError::Cancelled)));
        assert_eq!(events.lock().unwrap().last(), Some(&Progress::PhaseFinish));
    }
}
