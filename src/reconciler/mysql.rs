use tracing::{debug, info};

use crate::classifier::params::MySqlGrantParameters;
use crate::executor::Executor;
use crate::generator::mysql::{MySqlGrant, MySqlStep, MySqlStepKind};
use crate::parser::show_grants::observed_privileges;
use crate::reconciler::{
    Observation, ReconcileError, ERR_CREATE_GRANT, ERR_DISABLE_BINLOG, ERR_FLUSH,
    ERR_REVOKE_GRANT, ERR_SHOW_GRANTS,
};

/// Privileges currently granted on the target; `None` when the account has no
/// grant there (including error 1141).
async fn current_privileges<E>(
    executor: &E,
    grant: &MySqlGrant,
) -> Result<Option<Vec<String>>, ReconcileError>
where
    E: Executor + ?Sized,
{
    let query = grant.show_grants_query();
    debug!(sql = %query, "reading current grants");
    let rows = match executor.query(&query).await {
        Ok(rows) => rows,
        Err(source) if source.is_nonexisting_grant() => return Ok(None),
        Err(source) => return Err(ReconcileError::exec(ERR_SHOW_GRANTS)(source)),
    };
    let lines = rows
        .iter()
        .map(|row| row.get_text(0))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ReconcileError::exec(ERR_SHOW_GRANTS))?;
    let privileges = observed_privileges(
        lines,
        grant.database().as_target(),
        grant.table().as_target(),
    );
    Ok((!privileges.is_empty()).then_some(privileges))
}

/// Run planned steps in order; each failure names the step that failed.
async fn apply<E>(executor: &E, steps: &[MySqlStep]) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    for step in steps {
        let context = match step.kind {
            MySqlStepKind::DisableBinlog => ERR_DISABLE_BINLOG,
            MySqlStepKind::Revoke => ERR_REVOKE_GRANT,
            MySqlStepKind::Grant => ERR_CREATE_GRANT,
            MySqlStepKind::Flush => ERR_FLUSH,
        };
        debug!(sql = %step.statement, "applying change");
        executor
            .exec(&step.statement)
            .await
            .map_err(ReconcileError::exec(context))?;
    }
    Ok(())
}

/// Whether the account holds privileges on the target, and whether they match
/// the declared set.
pub async fn observe<E>(
    executor: &E,
    params: &MySqlGrantParameters,
) -> Result<Observation, ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = MySqlGrant::new(params)?;
    let Some(observed) = current_privileges(executor, &grant).await? else {
        return Ok(Observation::missing());
    };
    Ok(Observation::found(grant.update_steps(&observed).is_empty()))
}

/// Grant the declared privileges.
pub async fn create<E>(executor: &E, params: &MySqlGrantParameters) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = MySqlGrant::new(params)?;
    apply(executor, &grant.create_steps()).await?;
    info!(grantee = %grant.grantee(), "grant created");
    Ok(())
}

/// Revoke what is no longer declared, then grant what is missing.
pub async fn update<E>(executor: &E, params: &MySqlGrantParameters) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = MySqlGrant::new(params)?;
    let observed = current_privileges(executor, &grant)
        .await?
        .unwrap_or_default();
    let steps = grant.update_steps(&observed);
    if steps.is_empty() {
        debug!(grantee = %grant.grantee(), "grant already up to date");
        return Ok(());
    }

    apply(executor, &steps).await?;
    info!(grantee = %grant.grantee(), steps = steps.len(), "grant updated");
    Ok(())
}

/// Revoke the declared privileges; an account without grants is already gone.
pub async fn delete<E>(executor: &E, params: &MySqlGrantParameters) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = MySqlGrant::new(params)?;
    match apply(executor, &grant.delete_steps()).await {
        Ok(()) => {}
        Err(ReconcileError::Exec { source, .. }) if source.is_nonexisting_grant() => {
            debug!(grantee = %grant.grantee(), "no grant to revoke");
            return Ok(());
        }
        Err(err) => return Err(err),
    }
    info!(grantee = %grant.grantee(), "grant revoked");
    Ok(())
}
