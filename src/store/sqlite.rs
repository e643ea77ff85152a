// SQLite-backed movie store
// One connection behind a mutex; every operation is a single statement

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::movie::{Movie, NewMovie};
use super::seed::SEED_MOVIES;
use super::{StoreError, StoreResult};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    img TEXT,
    summary TEXT
)";

/// In-memory movie table
///
/// Clones share the same connection.
#[derive(Debug, Clone)]
pub struct MovieStore {
    conn: Arc<Mutex<Connection>>,
}

impl MovieStore {
    /// Open an empty in-memory store with the `movies` table created
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run store operations on the blocking thread pool
    pub async fn run<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Self) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Insert the fixed seed records, returning how many were written
    pub fn seed_defaults(&self) -> StoreResult<usize> {
        for (name, img, summary) in SEED_MOVIES {
            self.insert(&NewMovie::new(name, img, summary))?;
        }
        Ok(SEED_MOVIES.len())
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// All movies in insertion order
    pub fn list_all(&self) -> StoreResult<Vec<Movie>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, img, summary FROM movies ORDER BY id")?;
        let rows = stmt.query_map([], Movie::from_row)?;
        let movies = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    pub fn get_by_id(&self, id: i64) -> StoreResult<Movie> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, img, summary FROM movies WHERE id = ?1",
            params![id],
            Movie::from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound(id))
    }

    /// Store a new record and return its assigned id
    pub fn insert(&self, movie: &NewMovie) -> StoreResult<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO movies (name, img, summary) VALUES (?1, ?2, ?3)",
            params![movie.name, movie.img, movie.summary],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace all three text fields; returns rows affected (0 or 1)
    pub fn update_by_id(&self, id: i64, movie: &NewMovie) -> StoreResult<usize> {
        let conn = self.conn()?;
        let changes = conn.execute(
            "UPDATE movies SET name = ?1, img = ?2, summary = ?3 WHERE id = ?4",
            params![movie.name, movie.img, movie.summary, id],
        )?;
        Ok(changes)
    }

    /// Remove a record; returns rows affected (0 or 1)
    pub fn delete_by_id(&self, id: i64) -> StoreResult<usize> {
        let conn = self.conn()?;
        let changes = conn.execute("DELETE FROM movies WHERE id = ?1", params![id])?;
        Ok(changes)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
impl MovieStore {
    /// Panic while holding the connection lock
    pub fn poison(&self) {
        let conn = Arc::clone(&self.conn);
        let _ = std::thread::spawn(move || {
            let _guard = conn.lock();
            panic!("poisoning the movie store");
        })
        .join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MovieStore {
        let store = MovieStore::in_memory().unwrap();
        store.seed_defaults().unwrap();
        store
    }

    fn sample() -> NewMovie {
        NewMovie::new("X", "u", "s")
    }

    #[test]
    fn test_seed_assigns_ids_in_order() {
        let store = seeded();
        let movies = store.list_all().unwrap();
        assert_eq!(movies.len(), 3);
        assert_eq!(
            movies.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(movies[2].name, "Avengers: Endgame");
        assert_eq!(movies[0].img, "https://bit.ly/2IcnSwz");
    }

    #[test]
    fn test_empty_store() {
        let store = MovieStore::in_memory().unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_then_get() {
        let store = seeded();
        let id = store.insert(&sample()).unwrap();
        assert_eq!(id, 4);
        assert_eq!(store.get_by_id(id).unwrap(), sample().with_id(4));
    }

    #[test]
    fn test_get_missing() {
        let store = seeded();
        assert!(matches!(store.get_by_id(99), Err(StoreError::NotFound(99))));
    }

    #[test]
    fn test_update_replaces_fields() {
        let store = seeded();
        let changes = store.update_by_id(2, &sample()).unwrap();
        assert_eq!(changes, 1);
        assert_eq!(store.get_by_id(2).unwrap(), sample().with_id(2));
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_update_missing_creates_nothing() {
        let store = seeded();
        assert_eq!(store.update_by_id(42, &sample()).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_delete_twice() {
        let store = seeded();
        assert_eq!(store.delete_by_id(1).unwrap(), 1);
        assert_eq!(store.delete_by_id(1).unwrap(), 0);
        assert!(matches!(store.get_by_id(1), Err(StoreError::NotFound(1))));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_ids_never_reused() {
        let store = seeded();
        assert_eq!(store.delete_by_id(3).unwrap(), 1);
        let id = store.insert(&sample()).unwrap();
        assert_eq!(id, 4);
    }

    #[tokio::test]
    async fn test_run_on_blocking_pool() {
        let store = seeded();
        let movie = store
            .run(|store| {
                let id = store.insert(&sample())?;
                store.get_by_id(id)
            })
            .await
            .unwrap();
        assert_eq!(movie, sample().with_id(4));
        assert_eq!(store.count().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_poisoned_lock() {
        let store = seeded();
        store.poison();
        assert!(matches!(store.list_all(), Err(StoreError::Poisoned)));
        let result = store.run(|store| store.count()).await;
        assert!(matches!(result, Err(StoreError::Poisoned)));
    }
}
