//! Chain storage backends

use crate::blockchain::Block;
use crate::error::ChainError;
use crate::primitives::Hash;
use crate::transaction::Transaction;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable append-only block storage. `append` is all-or-nothing: a partially
/// written block is never observable through `tip` or `blocks`.
pub trait ChainStore: Send + Sync {
    /// Last block, or `None` before genesis.
    fn tip(&self) -> Result<Option<Block>, ChainError>;
    fn append(&self, block: &Block) -> Result<(), ChainError>;
    /// Every block in index order.
    fn blocks(&self) -> Result<Vec<Block>, ChainError>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

type BlockRow = (i64, i64, String, String, i64, String);

const SELECT_BLOCK: &str =
    "SELECT block_index, timestamp, previous_hash, hash, nonce, transactions FROM blocks";

impl Database {
    pub fn open(path: &str) -> Result<Self, ChainError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        ChainError::DatabaseError(format!(
                            "Failed to create data directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| ChainError::DatabaseError(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blocks (
                block_index INTEGER PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                previous_hash TEXT NOT NULL,
                hash TEXT NOT NULL,
                nonce INTEGER NOT NULL,
                transactions TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| ChainError::DatabaseError(format!("Failed to create blocks table: {}", e)))?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BlockRow> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn row_to_block(row: BlockRow) -> Result<Block, ChainError> {
        let (index, timestamp, previous_hash, hash, nonce, transactions_json) = row;
        let transactions: Vec<Transaction> = serde_json::from_str(&transactions_json).map_err(|e| {
            ChainError::DatabaseError(format!("Failed to deserialize transactions: {}", e))
        })?;
        Ok(Block::new(
            from_column(index, "block_index")?,
            from_column(timestamp, "timestamp")?,
            transactions,
            Hash::new(previous_hash)?,
            from_column(nonce, "nonce")?,
            Hash::new(hash)?,
        ))
    }
}

/// SQLite integers are signed; values above `i64::MAX` cannot be stored.
fn to_column(value: u64, field: &str) -> Result<i64, ChainError> {
    i64::try_from(value).map_err(|_| {
        ChainError::DatabaseError(format!("{} {} does not fit in an SQLite integer", field, value))
    })
}

fn from_column(value: i64, field: &str) -> Result<u64, ChainError> {
    u64::try_from(value)
        .map_err(|_| ChainError::DatabaseError(format!("Stored {} {} is negative", field, value)))
}

impl ChainStore for Database {
    fn tip(&self) -> Result<Option<Block>, ChainError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                &format!("{} ORDER BY block_index DESC LIMIT 1", SELECT_BLOCK),
                [],
                Database::read_row,
            )
            .optional()
            .map_err(|e| ChainError::DatabaseError(format!("Failed to query tip: {}", e)))?;
        row.map(Database::row_to_block).transpose()
    }

    fn append(&self, block: &Block) -> Result<(), ChainError> {
        let transactions_json = serde_json::to_string(&block.transactions).map_err(|e| {
            ChainError::DatabaseError(format!("Failed to serialize transactions: {}", e))
        })?;

        let index = to_column(block.index, "block_index")?;
        let timestamp = to_column(block.timestamp, "timestamp")?;
        let nonce = to_column(block.nonce, "nonce")?;

        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction().map_err(|e| {
            ChainError::DatabaseError(format!("Failed to start transaction: {}", e))
        })?;

        tx.execute(
            "INSERT INTO blocks (block_index, timestamp, previous_hash, hash, nonce, transactions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                index,
                timestamp,
                block.previous_hash.as_str(),
                block.hash.as_str(),
                nonce,
                transactions_json,
            ],
        )
        .map_err(|e| ChainError::DatabaseError(format!("Failed to save block: {}", e)))?;

        tx.commit().map_err(|e| {
            ChainError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    fn blocks(&self) -> Result<Vec<Block>, ChainError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY block_index ASC", SELECT_BLOCK))
            .map_err(|e| ChainError::DatabaseError(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], Database::read_row)
            .map_err(|e| ChainError::DatabaseError(format!("Failed to query blocks: {}", e)))?;

        let mut blocks = Vec::new();
        for row in rows {
            let row =
                row.map_err(|e| ChainError::DatabaseError(format!("Failed to load block: {}", e)))?;
            blocks.push(Database::row_to_block(row)?);
        }
        Ok(blocks)
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct InMemoryStore {
    blocks: Mutex<Vec<Block>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainStore for InMemoryStore {
    fn tip(&self) -> Result<Option<Block>, ChainError> {
        Ok(self.blocks.lock().last().cloned())
    }

    fn append(&self, block: &Block) -> Result<(), ChainError> {
        let mut blocks = self.blocks.lock();
        if blocks.iter().any(|b| b.index == block.index) {
            return Err(ChainError::DatabaseError(format!(
                "Block {} already stored",
                block.index
            )));
        }
        blocks.push(block.clone());
        Ok(())
    }

    fn blocks(&self) -> Result<Vec<Block>, ChainError> {
        Ok(self.blocks.lock().clone())
    }
}
