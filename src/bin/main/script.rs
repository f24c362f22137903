use anyhow::{Context, Result, bail};
use broadsheet_core::{catalog::Filter, document::PageId, intents::ReaderIntent};

/// One line of a session script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum ScriptStep {
    Intent(ReaderIntent),
    Wait(u64),
}

/// Parse a session script. Blank lines and `#` comments are skipped.
///
/// ```text
/// filter favorites
/// page p3
/// wait 1200
/// favorite
/// hide
/// ```
pub(super) fn parse(source: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("script line {}", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<ScriptStep> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let argument = words.next();
    if let Some(extra) = words.next() {
        bail!("unexpected argument {extra:?}");
    }

    let step = match (command, argument) {
        ("filter", Some(name)) => {
            ScriptStep::Intent(ReaderIntent::ChangeFilter(name.parse::<Filter>()?))
        }
        ("page", Some(id)) => ScriptStep::Intent(ReaderIntent::ChangePage(PageId::new(id))),
        ("favorite", None) => ScriptStep::Intent(ReaderIntent::ToggleFavorite),
        ("hide", None) => ScriptStep::Intent(ReaderIntent::ToggleHidden),
        ("wait", Some(ms)) => ScriptStep::Wait(
            ms.parse()
                .with_context(|| format!("invalid wait duration {ms:?}"))?,
        ),
        ("filter" | "page" | "wait", None) => bail!("{command} needs an argument"),
        ("favorite" | "hide", Some(_)) => bail!("{command} takes no argument"),
        _ => bail!("unknown command {command:?}"),
    };
    Ok(step)
}
