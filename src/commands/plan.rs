// Dry run: which artifacts `install` would try, in which order, and from where.

use crate::installers::prebuilt::{self, InstallPlan};
use crate::libs::candidates::candidate_url;
use crate::libs::config::InstallConfig;
use crate::libs::utilities::download::build_agent;
use colored::Colorize;

pub fn run(config: &InstallConfig) -> anyhow::Result<()> {
    let agent = build_agent();
    let plan = prebuilt::plan(config, &agent)?;
    for line in render(&plan) {
        println!("{line}");
    }
    Ok(())
}

/// One header line, then one numbered line per candidate.
fn render(plan: &InstallPlan) -> Vec<String> {
    let mut lines = Vec::with_capacity(plan.candidates.len() + 1);
    lines.push(format!(
        "{} {} for {} ({} candidate(s))",
        "Release".bold(),
        plan.release.tag.cyan(),
        plan.target,
        plan.candidates.len()
    ));

    for (index, candidate) in plan.candidates.iter().enumerate() {
        let url = candidate_url(candidate, &plan.download_root)
            .unwrap_or_else(|err| format!("<unresolvable: {err}>"));
        lines.push(format!(
            "{:>3}. {} [{}]\n     {}",
            index + 1,
            candidate.name,
            candidate.unpack,
            url.dimmed()
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::utilities::platform::resolve_target;
    use crate::schemas::candidate::AssetCandidate;
    use crate::schemas::release::{ReleaseContext, ReleaseSource};
    use url::Url;

    #[test]
    fn renders_every_candidate_with_its_url() {
        colored::control::set_override(false);
        let plan = InstallPlan {
            target: resolve_target("linux", "x86_64", "mtest").unwrap(),
            release: ReleaseContext {
                tag: "v1.2.3".into(),
                source: ReleaseSource::Explicit,
                assets: Vec::new(),
            },
            download_root: Url::parse("https://cdn.example/mtest/v1.2.3/").unwrap(),
            candidates: vec![
                AssetCandidate::with_url("mtest_linux_amd64.zip", "https://objects.example/1"),
                AssetCandidate::named("mtest-v1.2.3-linux-amd64.tar.gz"),
            ],
        };

        let lines = render(&plan);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Release v1.2.3 for linux/amd64 (mtest) (2 candidate(s))");
        assert_eq!(lines[1], "  1. mtest_linux_amd64.zip [zip]\n     https://objects.example/1");
        assert_eq!(
            lines[2],
            "  2. mtest-v1.2.3-linux-amd64.tar.gz [tar]\n     https://cdn.example/mtest/v1.2.3/mtest-v1.2.3-linux-amd64.tar.gz"
        );
    }
}
