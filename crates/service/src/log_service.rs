//! Create/read/update/delete and read-query operations over `system_log`.
//!
//! All functions are generic over [`ConnectionTrait`]; pass a transaction to group
//! several calls into one unit of work.

use models::{app_user, system_log};
use sea_orm::{
    sea_query::{Expr, Query, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityName, EntityTrait,
    FromQueryResult, JoinType, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, Statement, Value,
};
use tracing::{debug, info, instrument, warn};

use crate::domain::{LogPatch, LogSummary, LogWithOwner, NewLog, UserLogCount};
use crate::errors::ServiceError;

const ENTITY: &str = "system_log";

/// Insert a log and return its generated key.
#[instrument(skip_all, fields(user_id = input.user_id))]
pub async fn save_log<C: ConnectionTrait>(db: &C, input: NewLog) -> Result<i32, ServiceError> {
    let created = system_log::create(
        db,
        &input.log_serial,
        &input.description,
        input.log_date_time,
        input.user_id,
    )
    .await?;
    info!(log_id = created.id, "system_log_saved");
    Ok(created.id)
}

/// Overwrite `description`, `log_serial` and `log_date_time` of an existing log.
#[instrument(skip(db, patch))]
pub async fn update_log<C: ConnectionTrait>(
    db: &C,
    id: i32,
    patch: LogPatch,
) -> Result<i32, ServiceError> {
    system_log::validate(&patch.log_serial, &patch.description)?;
    let mut am: system_log::ActiveModel = system_log::Entity::find_by_id(id)
        .one(db).await.map_err(ServiceError::db)?
        .ok_or_else(|| {
            warn!(log_id = id, "system_log_update_target_missing");
            ServiceError::not_found(ENTITY)
        })?
        .into();
    am.description = Set(patch.description);
    am.log_serial = Set(patch.log_serial);
    am.log_date_time = Set(patch.log_date_time);
    let updated = am.update(db).await.map_err(ServiceError::db)?;
    info!(log_id = updated.id, "system_log_updated");
    Ok(updated.id)
}

/// Remove a log row.
#[instrument(skip(db))]
pub async fn delete_log<C: ConnectionTrait>(db: &C, id: i32) -> Result<i32, ServiceError> {
    let found = system_log::Entity::find_by_id(id)
        .one(db).await.map_err(ServiceError::db)?
        .ok_or_else(|| {
            warn!(log_id = id, "system_log_delete_target_missing");
            ServiceError::not_found(ENTITY)
        })?;
    found.delete(db).await.map_err(ServiceError::db)?;
    info!(log_id = id, "system_log_deleted");
    Ok(id)
}

/// Primary-key lookup.
pub async fn find_log_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<system_log::Model>, ServiceError> {
    system_log::Entity::find_by_id(id).one(db).await.map_err(ServiceError::db)
}

/// First log matching `cond` in key order, if any.
pub async fn find_first_log_where<C: ConnectionTrait>(
    db: &C,
    cond: Condition,
) -> Result<Option<system_log::Model>, ServiceError> {
    system_log::Entity::find()
        .filter(cond)
        .order_by_asc(system_log::Column::Id)
        .one(db)
        .await
        .map_err(ServiceError::db)
}

/// The only log matching `cond`; [`ServiceError::Ambiguous`] when several match.
pub async fn find_single_log_where<C: ConnectionTrait>(
    db: &C,
    cond: Condition,
) -> Result<Option<system_log::Model>, ServiceError> {
    // two rows are enough to detect ambiguity
    let mut rows = system_log::Entity::find()
        .filter(cond)
        .limit(2u64)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    if rows.len() > 1 {
        warn!(matched = rows.len(), "system_log_single_match_ambiguous");
        return Err(ServiceError::ambiguous(ENTITY));
    }
    Ok(rows.pop())
}

pub async fn find_log_first_match<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<system_log::Model>, ServiceError> {
    find_first_log_where(db, Condition::all().add(system_log::Column::Id.eq(id))).await
}

pub async fn find_log_single_match<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<system_log::Model>, ServiceError> {
    find_single_log_where(db, Condition::all().add(system_log::Column::Id.eq(id))).await
}

/// `log_serial` is not unique, so several logs may share one.
pub async fn find_first_log_by_serial<C: ConnectionTrait>(
    db: &C,
    serial: &str,
) -> Result<Option<system_log::Model>, ServiceError> {
    find_first_log_where(db, Condition::all().add(system_log::Column::LogSerial.eq(serial))).await
}

pub async fn find_single_log_by_serial<C: ConnectionTrait>(
    db: &C,
    serial: &str,
) -> Result<Option<system_log::Model>, ServiceError> {
    find_single_log_where(db, Condition::all().add(system_log::Column::LogSerial.eq(serial))).await
}

/// All logs in insertion (key) order, soft-deleted ones included.
pub async fn list_logs<C: ConnectionTrait>(db: &C) -> Result<Vec<system_log::Model>, ServiceError> {
    let rows = system_log::Entity::find()
        .order_by_asc(system_log::Column::Id)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    debug!(count = rows.len(), "system_log_listed");
    Ok(rows)
}

pub async fn list_logs_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<system_log::Model>, ServiceError> {
    system_log::Entity::find()
        .filter(system_log::Column::UserId.eq(user_id))
        .order_by_asc(system_log::Column::Id)
        .all(db)
        .await
        .map_err(ServiceError::db)
}

pub async fn count_logs_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<u64, ServiceError> {
    system_log::Entity::find()
        .filter(system_log::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(ServiceError::db)
}

pub async fn log_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let n = system_log::Entity::find_by_id(id).count(db).await.map_err(ServiceError::db)?;
    Ok(n > 0)
}

/// Hand-written SQL text; values travel as bound parameters.
pub(crate) fn raw_soft_delete_statement(backend: DbBackend, id: i32) -> Statement {
    let sql = match backend {
        DbBackend::Postgres => r#"UPDATE "system_log" SET "deleted" = $1 WHERE "id" = $2"#,
        DbBackend::MySql => "UPDATE `system_log` SET `deleted` = ? WHERE `id` = ?",
        _ => r#"UPDATE "system_log" SET "deleted" = ? WHERE "id" = ?"#,
    };
    Statement::from_sql_and_values(backend, sql, [Value::from(true), Value::from(id)])
}

/// Statement composed from typed parts; every interpolated value becomes a parameter.
pub(crate) fn interpolated_soft_delete_statement(backend: DbBackend, id: i32) -> Statement {
    let stmt = Query::update()
        .table(system_log::Entity.table_ref())
        .value(system_log::Column::Deleted, true)
        .and_where(Expr::col(system_log::Column::Id).eq(id))
        .to_owned();
    backend.build(&stmt)
}

async fn run_soft_delete<C: ConnectionTrait>(db: &C, stmt: Statement, id: i32) -> Result<bool, ServiceError> {
    let res = db.execute(stmt).await.map_err(ServiceError::db)?;
    let flipped = res.rows_affected() == 1;
    if flipped {
        info!(log_id = id, "system_log_soft_deleted");
    } else {
        warn!(log_id = id, rows = res.rows_affected(), "system_log_soft_delete_no_single_row");
    }
    Ok(flipped)
}

/// Mark a log deleted through a raw parameterized statement.
/// Returns whether exactly one row was affected.
pub async fn soft_delete_log_raw<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<bool, ServiceError> {
    let stmt = raw_soft_delete_statement(db.get_database_backend(), id);
    run_soft_delete(db, stmt, id).await
}

/// Same as [`soft_delete_log_raw`], with the statement built by the query builder.
pub async fn soft_delete_log_interpolated<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<bool, ServiceError> {
    let stmt = interpolated_soft_delete_statement(db.get_database_backend(), id);
    run_soft_delete(db, stmt, id).await
}

pub async fn list_log_summaries<C: ConnectionTrait>(db: &C) -> Result<Vec<LogSummary>, ServiceError> {
    system_log::Entity::find()
        .select_only()
        .columns([system_log::Column::Id, system_log::Column::Description])
        .order_by_asc(system_log::Column::Id)
        .into_model::<LogSummary>()
        .all(db)
        .await
        .map_err(ServiceError::db)
}

#[derive(FromQueryResult)]
struct IdAggregate {
    agg: Option<i32>,
}

#[derive(FromQueryResult)]
struct IdTotals {
    total: Option<i64>,
    n: i64,
}

async fn id_aggregate<C: ConnectionTrait>(db: &C, expr: SimpleExpr) -> Result<Option<i32>, ServiceError> {
    let row = system_log::Entity::find()
        .select_only()
        .column_as(expr, "agg")
        .into_model::<IdAggregate>()
        .one(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(row.and_then(|r| r.agg))
}

/// Smallest log key; `None` for an empty table.
pub async fn min_log_id<C: ConnectionTrait>(db: &C) -> Result<Option<i32>, ServiceError> {
    id_aggregate(db, Expr::col(system_log::Column::Id).min()).await
}

/// Largest log key; `None` for an empty table.
pub async fn max_log_id<C: ConnectionTrait>(db: &C) -> Result<Option<i32>, ServiceError> {
    id_aggregate(db, Expr::col(system_log::Column::Id).max()).await
}

/// Mean of the log keys; `None` for an empty table.
pub async fn average_log_id<C: ConnectionTrait>(db: &C) -> Result<Option<f64>, ServiceError> {
    // SUM/COUNT decode the same way on every backend, AVG does not
    let totals = system_log::Entity::find()
        .select_only()
        .column_as(Expr::col(system_log::Column::Id).sum(), "total")
        .column_as(Expr::col(system_log::Column::Id).count(), "n")
        .into_model::<IdTotals>()
        .one(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(match totals {
        Some(IdTotals { total: Some(total), n }) if n > 0 => Some(total as f64 / n as f64),
        _ => None,
    })
}

/// Log count per owning user, ordered by user id.
pub async fn count_logs_grouped_by_user<C: ConnectionTrait>(db: &C) -> Result<Vec<UserLogCount>, ServiceError> {
    system_log::Entity::find()
        .select_only()
        .column(system_log::Column::UserId)
        .column_as(Expr::col(system_log::Column::Id).count(), "log_count")
        .group_by(system_log::Column::UserId)
        .order_by_asc(system_log::Column::UserId)
        .into_model::<UserLogCount>()
        .all(db)
        .await
        .map_err(ServiceError::db)
}

/// Inner join of logs with their owners, in log key order.
pub async fn list_logs_with_owner<C: ConnectionTrait>(db: &C) -> Result<Vec<LogWithOwner>, ServiceError> {
    system_log::Entity::find()
        .select_only()
        .column(system_log::Column::Description)
        .column(app_user::Column::Username)
        .column(app_user::Column::EmailAddress)
        .join(JoinType::InnerJoin, system_log::Relation::AppUser.def())
        .order_by_asc(system_log::Column::Id)
        .into_model::<LogWithOwner>()
        .all(db)
        .await
        .map_err(ServiceError::db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogPatch;
    use crate::test_support::{get_db, new_log, new_user, ts};
    use crate::user_service::save_user;
    use sea_orm::TransactionTrait;
    use uuid::Uuid;

    #[tokio::test]
    async fn save_then_find_returns_same_fields() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let serial = Uuid::new_v4().simple().to_string()[..10].to_string();

        let id = save_log(&db, new_log(uid, &serial, "service started")).await?;
        let got = find_log_by_id(&db, id).await?.expect("saved log");
        assert_eq!(got.id, id);
        assert_eq!(got.log_serial, serial);
        assert_eq!(got.description, "service started");
        assert_eq!(got.log_date_time, ts(9));
        assert_eq!(got.user_id, uid);
        assert!(!got.deleted);
        Ok(())
    }

    #[tokio::test]
    async fn save_with_unknown_owner_is_constraint_violation() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res = save_log(&db, new_log(999, "SN-1", "orphan")).await;
        assert!(matches!(res, Err(ServiceError::ConstraintViolation(_))), "got {res:?}");
        assert!(list_logs(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn save_rejects_overlong_serial() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let res = save_log(&db, new_log(uid, "SERIAL-TOO-LONG", "x")).await;
        assert!(matches!(res, Err(ServiceError::ConstraintViolation(_))));
        assert!(list_logs(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_patched_fields_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let id = save_log(&db, new_log(uid, "SN-1", "before")).await?;

        let patch = LogPatch { log_serial: "SN-2".into(), description: "after".into(), log_date_time: ts(11) };
        assert_eq!(update_log(&db, id, patch).await?, id);

        let got = find_log_by_id(&db, id).await?.unwrap();
        assert_eq!(got.log_serial, "SN-2");
        assert_eq!(got.description, "after");
        assert_eq!(got.log_date_time, ts(11));
        assert_eq!(got.user_id, uid);
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_is_not_found_without_mutation() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let id = save_log(&db, new_log(uid, "SN-1", "untouched")).await?;
        let before = list_logs(&db).await?;

        let patch = LogPatch { log_serial: "SN-9".into(), description: "ghost".into(), log_date_time: ts(12) };
        let res = update_log(&db, id + 100, patch).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert_eq!(list_logs(&db).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_row_and_missing_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let id = save_log(&db, new_log(uid, "SN-1", "short lived")).await?;

        assert_eq!(delete_log(&db, id).await?, id);
        assert!(find_log_by_id(&db, id).await?.is_none());
        assert!(!log_exists(&db, id).await?);

        let again = delete_log(&db, id).await;
        assert!(matches!(again, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn id_lookups_agree_on_unique_keys() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let id = save_log(&db, new_log(uid, "SN-1", "one")).await?;
        save_log(&db, new_log(uid, "SN-2", "two")).await?;

        let exact = find_log_by_id(&db, id).await?;
        assert!(exact.is_some());
        assert_eq!(find_log_first_match(&db, id).await?, exact);
        assert_eq!(find_log_single_match(&db, id).await?, exact);

        assert!(find_log_by_id(&db, 4242).await?.is_none());
        assert!(find_log_first_match(&db, 4242).await?.is_none());
        assert!(find_log_single_match(&db, 4242).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn single_match_on_shared_serial_is_ambiguous() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let first = save_log(&db, new_log(uid, "DUP", "first")).await?;
        save_log(&db, new_log(uid, "DUP", "second")).await?;
        let lone = save_log(&db, new_log(uid, "LONE", "only one")).await?;

        let res = find_single_log_by_serial(&db, "DUP").await;
        assert!(matches!(res, Err(ServiceError::Ambiguous(_))));

        let picked = find_first_log_by_serial(&db, "DUP").await?.expect("first match");
        assert_eq!(picked.id, first);

        assert_eq!(find_single_log_by_serial(&db, "LONE").await?.map(|l| l.id), Some(lone));
        assert!(find_single_log_by_serial(&db, "NONE").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn soft_delete_variants_flip_exactly_one_row() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;
        let a = save_log(&db, new_log(uid, "SN-A", "raw")).await?;
        let b = save_log(&db, new_log(uid, "SN-B", "interpolated")).await?;

        assert!(soft_delete_log_raw(&db, a).await?);
        assert!(soft_delete_log_interpolated(&db, b).await?);
        assert!(find_log_by_id(&db, a).await?.unwrap().deleted);
        assert!(find_log_by_id(&db, b).await?.unwrap().deleted);

        // the row stays, only the flag changes
        assert_eq!(list_logs(&db).await?.len(), 2);

        assert!(!soft_delete_log_raw(&db, 4242).await?);
        assert!(!soft_delete_log_interpolated(&db, 4242).await?);
        Ok(())
    }

    #[test]
    fn soft_delete_statements_bind_values() {
        for backend in [DbBackend::Postgres, DbBackend::Sqlite] {
            let raw = raw_soft_delete_statement(backend, 1337);
            let built = interpolated_soft_delete_statement(backend, 1337);
            assert_eq!(raw.values, built.values);
            assert!(raw.values.is_some());
            // the key is a parameter, never part of the SQL text
            assert!(!raw.sql.contains("1337"));
            assert!(!built.sql.contains("1337"));
        }
        let pg = interpolated_soft_delete_statement(DbBackend::Postgres, 7);
        assert!(pg.sql.contains("$1") && pg.sql.contains("$2"));
    }

    #[tokio::test]
    async fn count_by_user_includes_zero() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let busy = save_user(&db, new_user("busy")).await?;
        let idle = save_user(&db, new_user("idle")).await?;
        for i in 0..3 {
            save_log(&db, new_log(busy, &format!("B-{i}"), "work")).await?;
        }
        assert_eq!(count_logs_by_user(&db, busy).await?, 3);
        assert_eq!(count_logs_by_user(&db, idle).await?, 0);
        assert_eq!(list_logs_by_user(&db, busy).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn group_counts_partition_all_logs() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = save_user(&db, new_user("a")).await?;
        let b = save_user(&db, new_user("b")).await?;
        save_user(&db, new_user("nologs")).await?;
        for i in 0..2 { save_log(&db, new_log(a, &format!("A-{i}"), "a")).await?; }
        for i in 0..5 { save_log(&db, new_log(b, &format!("B-{i}"), "b")).await?; }

        let groups = count_logs_grouped_by_user(&db).await?;
        assert_eq!(groups, vec![
            UserLogCount { user_id: a, log_count: 2 },
            UserLogCount { user_id: b, log_count: 5 },
        ]);
        let total: i64 = groups.iter().map(|g| g.log_count).sum();
        assert_eq!(total as usize, list_logs(&db).await?.len());
        Ok(())
    }

    #[tokio::test]
    async fn join_returns_one_row_per_log() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let alice = save_user(&db, new_user("alice")).await?;
        let bob = save_user(&db, new_user("bob")).await?;
        save_log(&db, new_log(alice, "A-1", "alice boots")).await?;
        save_log(&db, new_log(bob, "B-1", "bob logs in")).await?;
        save_log(&db, new_log(alice, "A-2", "alice logs out")).await?;

        let rows = list_logs_with_owner(&db).await?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], LogWithOwner {
            description: "alice boots".into(),
            username: "alice".into(),
            email_address: "alice@example.com".into(),
        });
        assert_eq!(rows[1].username, "bob");
        assert_eq!(rows[2].description, "alice logs out");
        Ok(())
    }

    #[tokio::test]
    async fn projection_and_aggregates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert_eq!(min_log_id(&db).await?, None);
        assert_eq!(max_log_id(&db).await?, None);
        assert_eq!(average_log_id(&db).await?, None);
        assert!(list_log_summaries(&db).await?.is_empty());

        let uid = save_user(&db, new_user("owner")).await?;
        let mut ids = vec![];
        for (i, d) in ["one", "two", "three"].iter().enumerate() {
            ids.push(save_log(&db, new_log(uid, &format!("SN-{i}"), d)).await?);
        }

        let summaries = list_log_summaries(&db).await?;
        assert_eq!(summaries[0], LogSummary { id: ids[0], description: "one".into() });
        assert_eq!(summaries.len(), 3);

        assert_eq!(min_log_id(&db).await?, Some(ids[0]));
        assert_eq!(max_log_id(&db).await?, Some(ids[2]));
        let expected = ids.iter().map(|&i| i as f64).sum::<f64>() / 3.0;
        let avg = average_log_id(&db).await?.expect("avg");
        assert!((avg - expected).abs() < 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn rolled_back_unit_of_work_leaves_no_logs() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uid = save_user(&db, new_user("owner")).await?;

        let txn = db.begin().await?;
        let id = save_log(&txn, new_log(uid, "TX-1", "pending")).await?;
        assert!(log_exists(&txn, id).await?);
        txn.rollback().await?;

        assert!(!log_exists(&db, id).await?);
        Ok(())
    }
}
