//! SyncEngine implementation
//!
//! One engine drives all three directions. Everything that differs between
//! them lives in [`DirectionRules`](super::DirectionRules); the control flow
//! below is shared.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use pack_codec::{CodecOptions, JsonLinesCodec, PackCodec};
use pack_fs::{NormalizedPath, TreeReplacer};
use tracing::{error, info, warn};

use crate::confirm::Confirm;
use crate::manifest::{Manifest, PackDescriptor};
use crate::resolver::PathResolver;
use crate::{Error, Result};

use super::direction::{CodecOperation, Direction, PackSource};
use super::report::{PackOutcome, PackReport, SyncOutcome, SyncReport};
use super::state::{StateLog, SyncState};

/// Options for a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Data form is the legacy single-file embedded database
    pub nedb: bool,
    /// Upper bound on packs converted in parallel
    pub jobs: usize,
    /// Treat skipped packs as a failed run
    pub strict: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            assume_yes: false,
            nedb: false,
            jobs: 1,
            strict: false,
        }
    }
}

/// A unit of work in the converting phase.
#[derive(Debug, Clone)]
enum PackJob {
    /// Manifest descriptor at `index` in the manifest's pack list
    Descriptor {
        index: usize,
        descriptor: PackDescriptor,
    },
    /// Entry found directly under the legacy data root
    Entry { name: String },
}

impl PackJob {
    fn label(&self) -> &str {
        match self {
            Self::Descriptor { descriptor, .. } => descriptor.name(),
            Self::Entry { name } => name,
        }
    }
}

/// Per-pack result plus the manifest path to persist if it converted.
type JobResult = (PackReport, Option<String>);

/// Everything validation hands to the destructive phases.
struct ValidatedRun {
    manifest: Manifest,
    manifest_dir: NormalizedPath,
    jobs: Vec<PackJob>,
}

/// Engine converting a module between data form and source form
///
/// The engine owns no global state: confirmation is passed to [`run`] and
/// all switches live in [`SyncOptions`].
///
/// [`run`]: SyncEngine::run
pub struct SyncEngine {
    direction: Direction,
    /// Root of the data form (`packs/`)
    data_root: NormalizedPath,
    /// Root of the source form (`src/packs/`)
    source_root: NormalizedPath,
    options: SyncOptions,
    codec: Box<dyn PackCodec>,
    replacer: TreeReplacer,
}

impl SyncEngine {
    /// Create a new SyncEngine using the built-in [`JsonLinesCodec`].
    pub fn new(
        direction: Direction,
        data_root: NormalizedPath,
        source_root: NormalizedPath,
        options: SyncOptions,
    ) -> Self {
        Self {
            direction,
            data_root,
            source_root,
            options,
            codec: Box::new(JsonLinesCodec::new()),
            replacer: TreeReplacer::new(),
        }
    }

    /// Use a different codec.
    pub fn with_codec(mut self, codec: Box<dyn PackCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Use a different tree replacer (retry policy).
    pub fn with_replacer(mut self, replacer: TreeReplacer) -> Self {
        self.replacer = replacer;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// (conversion source root, conversion target root)
    pub fn roots(&self) -> (&NormalizedPath, &NormalizedPath) {
        self.direction.roots(&self.data_root, &self.source_root)
    }

    /// Manifest read at the start of a run.
    pub fn manifest_input(&self) -> NormalizedPath {
        Manifest::path_for_root(self.roots().0)
    }

    /// Manifest written at the end of a run, if this direction writes one.
    pub fn manifest_output(&self) -> Option<NormalizedPath> {
        self.direction
            .rules()
            .rewrites_manifest
            .then(|| Manifest::path_for_root(self.roots().1))
    }

    /// Prompt shown before the destructive phase.
    pub fn confirmation_message(&self) -> String {
        let (source, target) = self.roots();
        match self.direction {
            Direction::Compile => format!(
                "This will overwrite compiled data in {} with packs compiled from {}. Continue?",
                target, source
            ),
            Direction::Extract | Direction::ExtractLegacy => format!(
                "This will overwrite all files in {} with data extracted from {}. Continue?",
                target, source
            ),
        }
    }

    /// Run the conversion.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned before anything is touched.
    /// [`Error::DestructiveStep`] and [`Error::ManifestWrite`] are returned
    /// after the target tree was replaced and leave it incomplete. Failures
    /// of individual packs are not errors; they are recorded in the report.
    pub fn run(&self, confirm: &dyn Confirm) -> Result<SyncOutcome> {
        let rules = self.direction.rules();
        let (source_root, target_root) = self.roots();
        let mut log = StateLog::new();

        log.enter(SyncState::ConfirmPending);
        if !self.options.assume_yes && !confirm.ask(&self.confirmation_message())? {
            log.enter(SyncState::Aborted);
            return Ok(SyncOutcome::Cancelled);
        }

        log.enter(SyncState::Validating);
        let ValidatedRun {
            mut manifest,
            manifest_dir,
            jobs,
        } = self.validate(source_root, target_root).inspect_err(|_| {
            log.enter(SyncState::Aborted);
        })?;

        log.enter(SyncState::Replacing);
        if let Err(source) = self.replacer.replace(target_root) {
            log.enter(SyncState::Aborted);
            return Err(Error::DestructiveStep {
                path: target_root.to_native(),
                source,
            });
        }

        let resolver = PathResolver::new(
            self.direction,
            source_root.clone(),
            target_root.clone(),
            manifest_dir,
        );
        let results = self.convert_all(&jobs, &resolver, &manifest, &mut log);

        let mut manifest_written = None;
        if rules.rewrites_manifest {
            log.enter(SyncState::RewritingManifest);
            for (job, (report, new_path)) in jobs.iter().zip(&results) {
                if let (PackJob::Descriptor { index, .. }, Some(path)) = (job, new_path)
                    && report.is_converted()
                {
                    manifest.packs_mut()[*index].set_path(path.clone());
                }
            }

            log.enter(SyncState::Persisting);
            let path = Manifest::path_for_root(target_root);
            info!("Writing module.json to {}", path);
            manifest.save(&path).map_err(|e| match e {
                Error::Fs(source) => Error::ManifestWrite {
                    path: path.to_native(),
                    source,
                },
                other => other,
            })?;
            manifest_written = Some(path);
        }

        log.enter(SyncState::Done);
        Ok(SyncOutcome::Completed(SyncReport {
            direction: self.direction,
            source_root: source_root.clone(),
            target_root: target_root.clone(),
            packs: results.into_iter().map(|(report, _)| report).collect(),
            manifest_written,
            states: log.into_states(),
        }))
    }

    fn validate(&self, source_root: &NormalizedPath, target_root: &NormalizedPath) -> Result<ValidatedRun> {
        if !source_root.is_dir() {
            return Err(Error::SourceMissing {
                path: source_root.to_native(),
            });
        }
        let native = source_root.to_native();
        let mut entries = fs::read_dir(&native).map_err(|e| pack_fs::Error::io(&native, e))?;
        if entries.next().is_none() {
            return Err(Error::SourceEmpty { path: native });
        }

        if target_root.starts_with(source_root) || source_root.starts_with(target_root) {
            return Err(Error::Configuration {
                message: format!(
                    "target {} and source {} overlap; replacing the target would destroy the source",
                    target_root, source_root
                ),
            });
        }

        let manifest_path = Manifest::path_for_root(source_root);
        if manifest_path.starts_with(target_root) {
            return Err(Error::Configuration {
                message: format!("manifest {} lies inside target {}", manifest_path, target_root),
            });
        }
        let manifest = Manifest::load(&manifest_path)?;
        manifest.validate()?;
        let manifest_dir = manifest_path
            .parent()
            .unwrap_or_else(|| source_root.join(".."));

        let jobs = match self.direction.rules().pack_source {
            PackSource::RootEntries => {
                let mut names = Vec::new();
                for entry in fs::read_dir(&native).map_err(|e| pack_fs::Error::io(&native, e))? {
                    let entry = entry.map_err(|e| pack_fs::Error::io(&native, e))?;
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
                names.sort();
                names.into_iter().map(|name| PackJob::Entry { name }).collect()
            }
            PackSource::ManifestPath | PackSource::NamedSubdirectory => manifest
                .packs()
                .iter()
                .enumerate()
                .map(|(index, descriptor)| PackJob::Descriptor {
                    index,
                    descriptor: descriptor.clone(),
                })
                .collect(),
        };

        Ok(ValidatedRun {
            manifest,
            manifest_dir,
            jobs,
        })
    }

    /// Convert every job, in parallel when `jobs > 1`.
    ///
    /// Results come back in job order whatever order workers finish in.
    fn convert_all(
        &self,
        jobs: &[PackJob],
        resolver: &PathResolver,
        manifest: &Manifest,
        log: &mut StateLog,
    ) -> Vec<JobResult> {
        let total = jobs.len();
        let workers = self.options.jobs.clamp(1, total.max(1));

        if workers == 1 {
            return jobs
                .iter()
                .enumerate()
                .map(|(index, job)| {
                    log.enter(SyncState::Converting { index, total });
                    self.convert_one(job, resolver, manifest)
                })
                .collect();
        }

        for index in 0..total {
            log.enter(SyncState::Converting { index, total });
        }
        let next = AtomicUsize::new(0);
        let next = &next;
        let mut slots: Vec<Option<JobResult>> = (0..total).map(|_| None).collect();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || {
                        let mut done = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            if index >= total {
                                break;
                            }
                            done.push((index, self.convert_one(&jobs[index], resolver, manifest)));
                        }
                        done
                    })
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(done) => {
                        for (index, result) in done {
                            slots[index] = Some(result);
                        }
                    }
                    Err(_) => error!("A pack worker panicked; its packs are reported as failed"),
                }
            }
        });

        slots
            .into_iter()
            .zip(jobs)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| {
                    (
                        PackReport {
                            name: job.label().to_string(),
                            outcome: PackOutcome::Failed {
                                error: "worker panicked before reporting".to_string(),
                            },
                        },
                        None,
                    )
                })
            })
            .collect()
    }

    fn convert_one(&self, job: &PackJob, resolver: &PathResolver, manifest: &Manifest) -> JobResult {
        let rules = self.direction.rules();
        let name = job.label().to_string();
        let report = |outcome| PackReport {
            name: name.clone(),
            outcome,
        };

        let resolved = match job {
            PackJob::Descriptor { descriptor, .. } => resolver.resolve(descriptor),
            PackJob::Entry { name } => resolver.resolve_legacy(name, manifest, self.options.nedb),
        };
        let resolved = match resolved {
            Ok(resolved) => resolved,
            Err(e) if e.is_pack_skip() => {
                warn!(pack = %name, "{}. Skipped.", e);
                return (report(PackOutcome::Skipped { reason: e.to_string() }), None);
            }
            Err(e) => {
                error!(pack = %name, "{}", e);
                return (report(PackOutcome::Failed { error: e.to_string() }), None);
            }
        };

        info!("{} {} to {}", rules.verb, resolved.source, resolved.target);
        let target = resolved.target.to_native();
        if let Err(e) = fs::create_dir(&target) {
            let e = pack_fs::Error::io(&target, e);
            error!(pack = %name, "{}", e);
            return (report(PackOutcome::Failed { error: e.to_string() }), None);
        }

        let options = CodecOptions::new(resolved.document_type).legacy(self.options.nedb);
        let converted = match rules.operation {
            CodecOperation::Extract => self.codec.extract(&resolved.source, &resolved.target, &options),
            CodecOperation::Compile => self.codec.compile(&resolved.source, &resolved.target, &options),
        };

        match converted {
            Ok(records) => (
                report(PackOutcome::Converted { records }),
                resolved.manifest_path,
            ),
            Err(e) => {
                error!(pack = %name, "Failed to convert {}: {}", resolved.source, e);
                // A partial pack must not be picked up by the next run
                if let Err(cleanup) = fs::remove_dir_all(&target) {
                    warn!(pack = %name, "Failed to remove partial output {}: {}", resolved.target, cleanup);
                }
                (report(PackOutcome::Failed { error: e.to_string() }), None)
            }
        }
    }
}
