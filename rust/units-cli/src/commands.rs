use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use units_repo::{Grammar, Reference, Registry, UnitGrammar, User, Variable};

use crate::{Command, UnitsCli, find_cycle, load_account};

/// Run `cli`, writing the command output to `out`.
pub fn run(cli: &UnitsCli, out: &mut impl Write) -> Result<()> {
    let account = load_account(&cli.dir, &cli.owner)?;
    let grammar = UnitGrammar::new(Registry::records());

    match &cli.command {
        Command::List => {
            for name in account.units() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Show { name } => {
            let variable = parse(&grammar, &account, name)?;
            writeln!(out, "{variable}")?;
        }
        Command::Deps { name } => {
            let variable = parse(&grammar, &account, name)?;
            for dependency in variable.references() {
                writeln!(out, "{dependency}")?;
            }
        }
        Command::Resolve { name } => {
            if let Some(cycle) = find_cycle(&*grammar, &account, name) {
                bail!("cannot resolve '{name}': cyclic reference {}", cycle.join(" -> "));
            }
            let value = Reference::new(grammar, name.as_str())?
                .instantiate(&account)
                .with_context(|| format!("resolving '{name}'"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&value.to_json())?)?;
        }
    }

    Ok(())
}

fn parse(grammar: &UnitGrammar, user: &impl User, name: &str) -> Result<Variable> {
    let unit = user
        .get(name)
        .ok_or_else(|| anyhow!("unit '{name}' not found in your account"))?;
    grammar
        .parse(unit.spec().as_text())
        .with_context(|| format!("parsing '{name}'"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn run_in(dir: &Path, command: Command) -> Result<String> {
        let cli = UnitsCli {
            dir: dir.to_path_buf(),
            owner: "alice".into(),
            command,
        };
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn workspace() -> Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("release.unit"),
            "# ship it\npipeline.Release([build, test], {\"dry\": false})\n",
        )?;
        std::fs::write(dir.path().join("build.unit"), "shell.Step(\"make\")")?;
        std::fs::write(dir.path().join("test.unit"), "shell.Step(\"make check\")")?;
        Ok(dir)
    }

    #[test]
    fn it_lists_units() -> TestResult {
        let dir = workspace()?;
        assert_eq!(run_in(dir.path(), Command::List)?, "build\nrelease\ntest\n");
        Ok(())
    }

    #[test]
    fn it_shows_canonical_text() -> TestResult {
        let dir = workspace()?;
        let shown = run_in(
            dir.path(),
            Command::Show {
                name: "release".into(),
            },
        )?;

        assert_eq!(
            shown,
            "pipeline.Release([build, test], {\"dry\": false})\n"
        );
        Ok(())
    }

    #[test]
    fn it_lists_direct_dependencies() -> TestResult {
        let dir = workspace()?;
        let deps = run_in(
            dir.path(),
            Command::Deps {
                name: "release".into(),
            },
        )?;

        assert_eq!(deps, "build\ntest\n");
        Ok(())
    }

    #[test]
    fn it_resolves_to_json() -> TestResult {
        let dir = workspace()?;
        let resolved = run_in(
            dir.path(),
            Command::Resolve {
                name: "release".into(),
            },
        )?;
        let json: serde_json::Value = serde_json::from_str(&resolved)?;

        assert_eq!(json["type"], "pipeline.Release");
        assert_eq!(json["name"], "release");
        assert_eq!(json["arguments"][0][1]["name"], "test");
        assert_eq!(json["arguments"][1]["dry"], false);
        Ok(())
    }

    #[test]
    fn it_refuses_cyclic_units() -> TestResult {
        let dir = workspace()?;
        std::fs::write(dir.path().join("build.unit"), "shell.Step(\"make\", release)")?;

        let error = run_in(
            dir.path(),
            Command::Resolve {
                name: "release".into(),
            },
        )
        .unwrap_err();

        assert_eq!(
            error.to_string(),
            "cannot resolve 'release': cyclic reference release -> build -> release"
        );
        Ok(())
    }

    #[test]
    fn it_reports_missing_units() -> TestResult {
        let dir = workspace()?;
        let error = run_in(
            dir.path(),
            Command::Resolve {
                name: "deploy".into(),
            },
        )
        .unwrap_err();

        assert_eq!(
            format!("{error:#}"),
            "resolving 'deploy': unit 'deploy' not found in your account"
        );
        Ok(())
    }
}
