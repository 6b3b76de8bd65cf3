//! Depth-first, pre-order traversal of a [`Value`] tree with visitor control.
//!
//! The visitor sees every node before its children, lists in index order and
//! maps in key order. For each node it returns a replacement and a [`Flow`]
//! signal telling the traversal how to continue. The result is the tree with
//! all replacements applied.

// used to log where a traversal stopped
use tracing::debug;

use crate::error::Result;
use crate::path::Path;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Descend into the replacement's children (lists and maps only).
    Continue,
    /// Skip the replacement's children and the remaining siblings at this level.
    Break,
    /// End the traversal, keeping the replacements made so far.
    Stop,
}

/// Visits `root` depth-first.
///
/// The visitor receives the original root, the path of the current node and
/// the current node, and returns the node's replacement with a [`Flow`].
/// Errors returned by the visitor abort the traversal and are passed on;
/// `Break` and `Stop` are never reported as errors.
pub fn traverse_depth_first<F>(root: &Value, mut visit: F) -> Result<Value>
where
    F: FnMut(&Value, &Path, &Value) -> Result<(Value, Flow)>,
{
    let mut path = Path::empty();
    let (replaced, flow) = step(root, &mut path, root, &mut visit)?;
    if flow == Flow::Stop {
        debug!("traversal stopped early");
    }
    Ok(replaced)
}

fn step<F>(root: &Value, path: &mut Path, current: &Value, visit: &mut F) -> Result<(Value, Flow)>
where
    F: FnMut(&Value, &Path, &Value) -> Result<(Value, Flow)>,
{
    let (mut replacement, flow) = visit(root, path, current)?;
    if flow != Flow::Continue {
        return Ok((replacement, flow));
    }
    let mut stopped = false;
    match &mut replacement {
        Value::Null
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::String(_)
        | Value::Time(_) => (),
        Value::List(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                path.push(index);
                let outcome = step(root, path, &*item, visit);
                path.pop();
                let (replaced, flow) = outcome?;
                *item = replaced;
                match flow {
                    Flow::Continue => (),
                    Flow::Break => break,
                    Flow::Stop => {
                        stopped = true;
                        break;
                    }
                }
            }
        }
        Value::Map(entries) => {
            for (key, entry) in entries.iter_mut() {
                path.push(key.as_str());
                let outcome = step(root, path, &*entry, visit);
                path.pop();
                let (replaced, flow) = outcome?;
                *entry = replaced;
                match flow {
                    Flow::Continue => (),
                    Flow::Break => break,
                    Flow::Stop => {
                        stopped = true;
                        break;
                    }
                }
            }
        }
    }
    let flow = if stopped { Flow::Stop } else { Flow::Continue };
    Ok((replacement, flow))
}
