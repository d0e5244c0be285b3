use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::model::AssetMatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    AlreadyRecorded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAssignment {
    pub index: usize,
    pub player: String,
    pub asset_path: String,
    pub confidence: u32,
    pub recorded_at: String,
}

pub fn open_ledger(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open ledger {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS assignments (
            batch TEXT NOT NULL,
            idx INTEGER NOT NULL,
            player TEXT NOT NULL,
            asset_path TEXT NOT NULL,
            confidence INTEGER NOT NULL,
            recorded_at TEXT NOT NULL,
            PRIMARY KEY (batch, idx),
            UNIQUE (batch, asset_path)
        );
        "#,
    )
    .context("create ledger schema")?;
    Ok(())
}

/// Stores one accepted assignment in its own transaction.
pub fn record_assignment(
    conn: &mut Connection,
    batch: &str,
    index: usize,
    result: &AssetMatchResult,
) -> Result<RecordOutcome> {
    let asset = result
        .chosen
        .as_ref()
        .ok_or_else(|| anyhow!("entry {} at index {index} has no chosen asset", result.entry.player))?;
    let idx = i64::try_from(index).context("ledger index out of range")?;
    let player = result.entry.player.to_string();

    let tx = conn.transaction().context("begin ledger transaction")?;
    let existing: Option<String> = tx
        .query_row(
            "SELECT asset_path FROM assignments WHERE batch = ?1 AND idx = ?2",
            params![batch, idx],
            |row| row.get(0),
        )
        .optional()
        .context("look up ledger index")?;
    if let Some(path) = existing {
        debug!(batch, index, path = %path, "index already recorded");
        return Ok(RecordOutcome::AlreadyRecorded);
    }

    let owner: Option<(i64, String)> = tx
        .query_row(
            "SELECT idx, player FROM assignments WHERE batch = ?1 AND asset_path = ?2",
            params![batch, asset.path],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .context("look up ledger asset")?;
    if let Some((other_idx, other_player)) = owner {
        return Err(anyhow!(
            "asset {} already assigned to {other_player} (index {other_idx}) in batch {batch}",
            asset.path
        ));
    }

    tx.execute(
        "INSERT INTO assignments (batch, idx, player, asset_path, confidence, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            batch,
            idx,
            player,
            asset.path,
            i64::from(result.confidence),
            Utc::now().to_rfc3339()
        ],
    )
    .context("insert ledger row")?;
    tx.commit().context("commit ledger row")?;
    Ok(RecordOutcome::Recorded)
}

/// Index to continue from: one past the highest recorded index, or 0.
pub fn resume_index(conn: &Connection, batch: &str) -> Result<usize> {
    let last: Option<i64> = conn
        .query_row(
            "SELECT MAX(idx) FROM assignments WHERE batch = ?1",
            params![batch],
            |row| row.get(0),
        )
        .context("read ledger resume index")?;
    let next = match last {
        Some(idx) => usize::try_from(idx + 1).context("ledger index out of range")?,
        None => 0,
    };
    info!(batch, next, "ledger resume index");
    Ok(next)
}

pub fn recorded_assets(conn: &Connection, batch: &str) -> Result<Vec<RecordedAssignment>> {
    let mut stmt = conn
        .prepare(
            "SELECT idx, player, asset_path, confidence, recorded_at
             FROM assignments WHERE batch = ?1 ORDER BY idx",
        )
        .context("prepare ledger query")?;
    let rows = stmt
        .query_map(params![batch], |row| {
            let idx: i64 = row.get(0)?;
            let confidence: i64 = row.get(3)?;
            Ok(RecordedAssignment {
                index: usize::try_from(idx).unwrap_or_default(),
                player: row.get(1)?,
                asset_path: row.get(2)?,
                confidence: u32::try_from(confidence).unwrap_or_default(),
                recorded_at: row.get(4)?,
            })
        })
        .context("query ledger rows")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("read ledger row")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetCandidate, PlayerRef, RosterEntry, TeamRef};

    fn ledger() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn matched(id: &str, path: &str) -> AssetMatchResult {
        AssetMatchResult {
            entry: RosterEntry {
                player: PlayerRef::new(id),
                first_name: "A".into(),
                last_name: "B".into(),
                team: TeamRef::new("t1"),
            },
            chosen: Some(AssetCandidate::from_path(path)),
            confidence: 88,
            runner_ups: Vec::new(),
        }
    }

    #[test]
    fn resume_starts_at_zero_and_advances() {
        let mut conn = ledger();
        assert_eq!(resume_index(&conn, "b1").unwrap(), 0);
        record_assignment(&mut conn, "b1", 0, &matched("p1", "T/a.png")).unwrap();
        record_assignment(&mut conn, "b1", 1, &matched("p2", "T/b.png")).unwrap();
        assert_eq!(resume_index(&conn, "b1").unwrap(), 2);
        assert_eq!(resume_index(&conn, "b2").unwrap(), 0);
    }

    #[test]
    fn re_recording_an_index_is_a_no_op() {
        let mut conn = ledger();
        let r = matched("p1", "T/a.png");
        assert_eq!(record_assignment(&mut conn, "b1", 0, &r).unwrap(), RecordOutcome::Recorded);
        assert_eq!(
            record_assignment(&mut conn, "b1", 0, &r).unwrap(),
            RecordOutcome::AlreadyRecorded
        );
        assert_eq!(recorded_assets(&conn, "b1").unwrap().len(), 1);
    }

    #[test]
    fn an_asset_is_claimed_once_per_batch() {
        let mut conn = ledger();
        record_assignment(&mut conn, "b1", 0, &matched("p1", "T/a.png")).unwrap();
        let err = record_assignment(&mut conn, "b1", 1, &matched("p2", "T/a.png")).unwrap_err();
        assert!(err.to_string().contains("already assigned"));
        assert_eq!(resume_index(&conn, "b1").unwrap(), 1);

        // other batches are independent
        record_assignment(&mut conn, "b2", 0, &matched("p2", "T/a.png")).unwrap();
        let rows = recorded_assets(&conn, "b2").unwrap();
        assert_eq!(rows[0].player, "2");
        assert_eq!(rows[0].confidence, 88);
    }

    #[test]
    fn unmatched_results_are_rejected() {
        let mut conn = ledger();
        let mut r = matched("p1", "T/a.png");
        r.chosen = None;
        assert!(record_assignment(&mut conn, "b1", 0, &r).is_err());
        assert_eq!(resume_index(&conn, "b1").unwrap(), 0);
    }
}
