//! Observe/Create/Update/Delete shims that an external control loop calls once
//! per reconciliation pass.
//!
//! Every function classifies and validates its parameters, synthesizes the
//! statements, and runs them sequentially over one [`Executor`]. Nothing is
//! cached between calls.
//!
//! [`Executor`]: crate::executor::Executor

/// `MySQL` grants.
pub mod mysql;
/// `PostgreSQL` grants.
pub mod postgres;

use crate::error::GrantError;
use crate::executor::ExecError;

/// What an observe pass found on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    /// The grant exists in some form.
    pub exists: bool,
    /// The grant exists and matches the declared parameters exactly.
    pub up_to_date: bool,
}

impl Observation {
    /// No grant on the server.
    pub fn missing() -> Self {
        Self::default()
    }

    /// A grant that may or may not match.
    pub fn found(up_to_date: bool) -> Self {
        Self {
            exists: true,
            up_to_date,
        }
    }
}

/// Failure of a reconciler shim.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The parameters do not describe a valid grant.
    #[error(transparent)]
    Grant(#[from] GrantError),
    /// The executor failed; `context` names the phase.
    #[error("{context}: {source}")]
    Exec {
        /// Phase that failed, e.g. `cannot create grant`.
        context: &'static str,
        /// Executor error.
        #[source]
        source: ExecError,
    },
}

impl ReconcileError {
    pub(crate) fn exec(context: &'static str) -> impl FnOnce(ExecError) -> Self {
        move |source| ReconcileError::Exec { context, source }
    }
}

pub(crate) const ERR_SELECT_GRANT: &str = "cannot select grant";
pub(crate) const ERR_CREATE_GRANT: &str = "cannot create grant";
pub(crate) const ERR_REVOKE_GRANT: &str = "cannot revoke grant";
pub(crate) const ERR_SHOW_GRANTS: &str = "cannot show current grants";
pub(crate) const ERR_FLUSH: &str = "cannot flush privileges";
pub(crate) const ERR_DISABLE_BINLOG: &str = "cannot disable binary logging";
