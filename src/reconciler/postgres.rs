use tracing::{debug, info};

use crate::classifier::params::GrantParameters;
use crate::executor::{ExecError, Executor};
use crate::generator::postgres::PgGrant;
use crate::reconciler::{
    Observation, ReconcileError, ERR_CREATE_GRANT, ERR_REVOKE_GRANT, ERR_SELECT_GRANT,
};

/// Whether the grant exists; for `PostgreSQL` an existing grant is always up
/// to date, since the query matches the exact privilege set and option.
pub async fn observe<E>(
    executor: &E,
    params: &GrantParameters,
) -> Result<Observation, ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = PgGrant::new(params)?;
    let query = grant.select_query();
    debug!(sql = %query, grant_type = %grant.grant_type(), "selecting grant");

    let row = match executor.scan(&query).await {
        Ok(row) => row,
        Err(ExecError::NoRows) => return Ok(Observation::missing()),
        Err(source) => return Err(ReconcileError::exec(ERR_SELECT_GRANT)(source)),
    };
    let exists = row.get_bool(0).map_err(ReconcileError::exec(ERR_SELECT_GRANT))?;
    Ok(if exists {
        Observation::found(true)
    } else {
        Observation::missing()
    })
}

/// Replace whatever is granted on the target with the declared grant, in one
/// transaction.
pub async fn create<E>(executor: &E, params: &GrantParameters) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = PgGrant::new(params)?;
    let queries = grant.create_queries();
    for query in &queries {
        debug!(sql = %query, "queued");
    }
    executor
        .exec_transaction(&queries)
        .await
        .map_err(ReconcileError::exec(ERR_CREATE_GRANT))?;
    info!(role = grant.role(), grant_type = %grant.grant_type(), "grant created");
    Ok(())
}

/// Same statements as [`create`]: revoking everything first makes the grant
/// converge whatever the server currently holds.
pub async fn update<E>(executor: &E, params: &GrantParameters) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = PgGrant::new(params)?;
    executor
        .exec_transaction(&grant.create_queries())
        .await
        .map_err(ReconcileError::exec(ERR_CREATE_GRANT))?;
    info!(role = grant.role(), grant_type = %grant.grant_type(), "grant updated");
    Ok(())
}

/// Revoke the declared privileges (or membership).
pub async fn delete<E>(executor: &E, params: &GrantParameters) -> Result<(), ReconcileError>
where
    E: Executor + ?Sized,
{
    let grant = PgGrant::new(params)?;
    let query = grant.delete_query();
    debug!(sql = %query, "revoking grant");
    executor
        .exec(&query)
        .await
        .map_err(ReconcileError::exec(ERR_REVOKE_GRANT))?;
    info!(role = grant.role(), grant_type = %grant.grant_type(), "grant revoked");
    Ok(())
}
