//! Per-output witness search and reported-class filtering.

use std::collections::HashSet;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::reference::Ref;
use crate::search::{Diagram, Outcome, Search, SearchOptions};
use crate::vars::{VarInfo, VarTable};

/// Search result for one output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WitnessResult {
    pub output: usize,
    pub found: bool,
    /// Reported variables as `(key, value)`, ascending by variable index.
    /// Empty unless `found`.
    pub assignments: Vec<(String, u8)>,
}

/// JSON key for a reported variable: `L` becomes `L0`, `L[<digits>]` becomes `L<digits>`.
///
/// The leading letter may be lower case; the key always starts with `L`.
/// Any other shape is rejected.
pub fn reported_key(name: &str) -> Result<String> {
    let malformed = || Error::MalformedName {
        name: name.to_string(),
    };

    let rest = name
        .strip_prefix('L')
        .or_else(|| name.strip_prefix('l'))
        .ok_or_else(malformed)?;
    if rest.is_empty() {
        return Ok("L0".to_string());
    }

    let digits = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(malformed)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    Ok(format!("L{}", digits))
}

/// Keys of the reported class, validated once per run so a malformed or
/// clashing name fails before any search starts.
fn reported_vars(vars: &VarTable) -> Result<Vec<(&VarInfo, String)>> {
    let mut seen = HashSet::new();
    let mut reported = Vec::new();
    for info in vars.iter().filter(|info| info.is_reported()) {
        let key = reported_key(&info.name)?;
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateKey { key });
        }
        reported.push((info, key));
    }
    Ok(reported)
}

/// Run one independent search per root, in order.
///
/// Each output gets its own cube and visited set.
pub fn find_witnesses<D>(
    diagram: &D,
    roots: &[Ref],
    vars: &VarTable,
    options: SearchOptions,
) -> Result<Vec<WitnessResult>>
where
    D: Diagram + ?Sized,
{
    let reported = reported_vars(vars)?;
    debug!("{} reported variables", reported.len());

    let mut results = Vec::with_capacity(roots.len());
    for (output, &root) in roots.iter().enumerate() {
        let outcome = Search::new(diagram, vars, options)?.run(root)?;
        let result = match outcome {
            Outcome::Found(cube) => {
                debug!("D[{}]: witness {}", output, cube);
                let assignments = reported
                    .iter()
                    .map(|(info, key)| (key.clone(), cube.get(info.index).or_zero()))
                    .collect();
                WitnessResult {
                    output,
                    found: true,
                    assignments,
                }
            }
            Outcome::NotFound => {
                debug!("D[{}]: no witness", output);
                WitnessResult {
                    output,
                    found: false,
                    assignments: Vec::new(),
                }
            }
        };
        results.push(result);
    }

    info!(
        "Witnesses found for {} of {} outputs",
        results.iter().filter(|r| r.found).count(),
        results.len()
    );
    Ok(results)
}
