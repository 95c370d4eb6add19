// Installs the prebuilt runtime binary published with each mtest release.
//
// One run moves through these phases, strictly in order:
//   resolving platform -> resolving release -> building candidates -> attempting candidate i
// and ends either installed or exhausted. Unsupported platforms fail before any network
// traffic. A failing candidate is logged and the next one is tried; each attempt works in its
// own temporary directory which is removed afterwards, whatever the outcome.
// The candidate loop itself is the `Phase` state machine below.

// Each stage of a run lives in its own module under `libs`.
use crate::libs::candidates::{build_candidates, candidate_url, download_root};
use crate::libs::config::InstallConfig;
use crate::libs::errors::InstallError;
use crate::libs::paths;
use crate::libs::release_resolver::resolve_release;
use crate::libs::utilities::binary::{find_binary, install_binary};
use crate::libs::utilities::compression::{Unpacked, unpack};
use crate::libs::utilities::download::{build_agent, download_file};
use crate::libs::utilities::platform::resolve_target;
use crate::schemas::candidate::AssetCandidate;
use crate::schemas::platform::PlatformTarget;
use crate::schemas::release::ReleaseContext;
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
// Candidate URLs are joined onto the download root.
use url::Url;

/// State of the candidate loop. `Installed` and `Exhausted` are terminal.
///
/// The loop only ever moves forward: an `Attempting` state either installs its candidate or
/// hands over to the next index, so no candidate is tried twice.
#[derive(Debug)]
enum Phase {
    Attempting {
        index: usize,
        last_error: Option<InstallError>,
    },
    Installed {
        index: usize,
        candidate: String,
    },
    Exhausted {
        attempts: usize,
        last_error: Option<InstallError>,
    },
}

impl Phase {
    fn start() -> Self {
        Phase::Attempting {
            index: 0,
            last_error: None,
        }
    }

    /// Performs one transition. Terminal states are returned unchanged.
    fn advance<F>(self, candidates: &[AssetCandidate], try_candidate: &mut F) -> Phase
    where
        F: FnMut(&AssetCandidate) -> Result<(), InstallError>,
    {
        let (index, last_error) = match self {
            Phase::Attempting { index, last_error } => (index, last_error),
            terminal => return terminal,
        };

        // Running off the end of the list means every candidate has failed.
        let Some(candidate) = candidates.get(index) else {
            return Phase::Exhausted {
                attempts: index,
                last_error,
            };
        };

        log_debug!(
            "[Prebuilt] Attempting candidate #{} of {}: {}",
            index + 1,
            candidates.len(),
            candidate.name
        );
        match try_candidate(candidate) {
            Ok(()) => Phase::Installed {
                index,
                candidate: candidate.name.clone(),
            },
            Err(err) => {
                log_warn!("[Prebuilt] Candidate {} failed: {}", candidate.name.yellow(), err);
                Phase::Attempting {
                    index: index + 1,
                    last_error: Some(err),
                }
            }
        }
    }
}

/// Drives the loop from the first candidate to a terminal state.
fn run_candidates<F>(candidates: &[AssetCandidate], mut try_candidate: F) -> Phase
where
    F: FnMut(&AssetCandidate) -> Result<(), InstallError>,
{
    let mut phase = Phase::start();
    while matches!(phase, Phase::Attempting { .. }) {
        phase = phase.advance(candidates, &mut try_candidate);
    }
    phase
}

/// Everything decided before the first download: what to fetch, and from where.
#[derive(Debug)]
pub struct InstallPlan {
    pub target: PlatformTarget,
    pub release: ReleaseContext,
    pub download_root: Url,
    pub candidates: Vec<AssetCandidate>,
}

/// The result of a successful run.
#[derive(Debug)]
pub struct InstallOutcome {
    pub binary_path: PathBuf,
    pub tag: String,
    pub candidate: String,
    pub attempts: usize,
}

/// Resolves platform, release and candidates without downloading any artifact.
///
/// # Errors
/// The platform and release errors of the run (`UnsupportedPlatform`, `UnsupportedArchitecture`,
/// `NoReleaseTagResolvable`) and `Config` when there is no download root.
pub fn plan(config: &InstallConfig, agent: &ureq::Agent) -> Result<InstallPlan, InstallError> {
    log_debug!("[Prebuilt] Resolving platform target");
    let target = resolve_target(&config.host_os, &config.host_arch, &config.component)?;
    log_info!("[Prebuilt] Platform target: {}", target.to_string().cyan());

    log_debug!("[Prebuilt] Resolving release");
    let release = resolve_release(config, agent)?;
    log_info!(
        "[Prebuilt] Using release {} ({})",
        release.tag.bold(),
        release.source.to_string().dimmed()
    );

    log_debug!("[Prebuilt] Building candidates");
    let download_root = download_root(config, &release)?;
    let candidates = build_candidates(&target, config, &release);
    log_debug!(
        "[Prebuilt] {} candidate(s) against {}",
        candidates.len(),
        download_root.as_str().blue()
    );

    Ok(InstallPlan {
        target,
        release,
        download_root,
        candidates,
    })
}

/// Runs the whole installation for `config`.
///
/// # Errors
/// Everything `plan` can fail with, plus `CandidatesExhausted` carrying the last
/// per-candidate error when no candidate could be installed.
pub fn install(config: &InstallConfig) -> Result<InstallOutcome, InstallError> {
    // Platform checks come first so an unsupported host never reaches the network.
    resolve_target(&config.host_os, &config.host_arch, &config.component)?;

    let agent = build_agent();
    let plan = plan(config, &agent)?;

    let temp_root = paths::temp_root(config.temp_root.as_deref());
    fs::create_dir_all(&temp_root)
        .map_err(|e| InstallError::io(format!("creating {}", temp_root.display()), e))?;
    let destination = paths::installed_binary_path(&config.install_dir, &plan.target.binary_name);

    let outcome = run_candidates(&plan.candidates, |candidate| {
        attempt(&agent, &plan, candidate, &temp_root, &destination)
    });

    match outcome {
        Phase::Installed { index, candidate } => {
            log_info!(
                "[Prebuilt] Installed {} from {}",
                destination.to_string_lossy().green(),
                candidate.bold()
            );
            Ok(InstallOutcome {
                binary_path: destination,
                tag: plan.release.tag,
                candidate,
                attempts: index + 1,
            })
        }
        Phase::Exhausted { attempts, last_error }
        | Phase::Attempting {
            index: attempts,
            last_error,
        } => Err(InstallError::CandidatesExhausted {
            attempts,
            last: last_error.map(Box::new),
        }),
    }
}

/// Fetch, unpack, locate and install one candidate inside a private work directory.
fn attempt(
    agent: &ureq::Agent,
    plan: &InstallPlan,
    candidate: &AssetCandidate,
    temp_root: &Path,
    destination: &Path,
) -> Result<(), InstallError> {
    let url = candidate_url(candidate, &plan.download_root)?;

    let work_dir = tempfile::Builder::new()
        .prefix("mtest-fetch-")
        .tempdir_in(temp_root)
        .map_err(|e| InstallError::io(format!("creating a work directory in {}", temp_root.display()), e))?;

    let result = fetch_and_install(agent, &url, plan, candidate, work_dir.path(), destination);

    let work_path = work_dir.path().to_path_buf();
    if let Err(err) = work_dir.close() {
        log_warn!(
            "[Prebuilt] Could not remove work directory {}: {}",
            work_path.to_string_lossy().yellow(),
            err
        );
    }
    result
}

fn fetch_and_install(
    agent: &ureq::Agent,
    url: &str,
    plan: &InstallPlan,
    candidate: &AssetCandidate,
    work_dir: &Path,
    destination: &Path,
) -> Result<(), InstallError> {
    log_info!("[Prebuilt] Downloading {}", url.blue());
    let artifact = work_dir.join(candidate.file_name());
    let bytes = download_file(agent, url, &artifact)?;
    log_debug!("[Prebuilt] Downloaded {} bytes to {}", bytes, artifact.display());

    let binary = match unpack(&artifact, candidate.unpack, work_dir)? {
        Unpacked::Binary(path) => path,
        Unpacked::Extracted(dir) => {
            let expected = &plan.target.binary_name;
            find_binary(&dir, expected, !cfg!(windows)).ok_or_else(|| InstallError::BinaryNotFoundInArchive {
                expected: expected.clone(),
            })?
        }
    };

    install_binary(&binary, destination)
}
