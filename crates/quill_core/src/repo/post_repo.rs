//! Post repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `posts` table.
//!
//! # Invariants
//! - Write paths call `Post::validate()` before SQL mutations.
//! - `category` is stored with its display spelling (`Fiction`, `Non-Fiction`).
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::post::{Category, NewPost, Post, PostId};
use crate::repo::{ensure_table_ready, RepoError, RepoResult, POST_ENTITY};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const POST_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "category",
    "summary",
    "created_at",
    "updated_at",
];

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    summary,
    created_at,
    updated_at
FROM posts";

/// Query options for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Exact category filter. `None` lists every post, uncategorized included.
    pub category: Option<Category>,
}

/// Repository interface for post CRUD operations.
pub trait PostRepository {
    /// Inserts a new post and returns the storage-assigned id.
    fn create_post(&self, post: &Post) -> RepoResult<PostId>;
    /// Rewrites every mutable field of a persisted post and stamps
    /// `updated_at` with the current epoch milliseconds.
    fn update_post(&self, post: &Post) -> RepoResult<()>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists posts ordered by id.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "posts", POST_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &Post) -> RepoResult<PostId> {
        post.validate()?;

        self.conn.execute(
            "INSERT INTO posts (title, content, category, summary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                post.title(),
                post.content(),
                post.category().map(Category::as_str),
                post.summary(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_post(&self, post: &Post) -> RepoResult<()> {
        let id = post.id().ok_or_else(|| {
            RepoError::InvalidData("cannot update a post that was never persisted".to_string())
        })?;
        post.validate()?;

        let changed = self.conn.execute(
            "UPDATE posts
             SET
                title = ?1,
                content = ?2,
                category = ?3,
                summary = ?4,
                updated_at = (CAST(unixepoch('subsec') * 1000 AS INTEGER))
             WHERE id = ?5;",
            params![
                post.title(),
                post.content(),
                post.category().map(Category::as_str),
                post.summary(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: POST_ENTITY,
                id,
            });
        }

        Ok(())
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }

        Ok(None)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: POST_ENTITY,
                id,
            });
        }

        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id: PostId = row.get("id")?;
    let input = NewPost {
        title: row.get("title")?,
        content: row.get("content")?,
        summary: row.get("summary")?,
        category: row.get("category")?,
    };

    Post::from_storage(id, input, row.get("created_at")?, row.get("updated_at")?)
        .map_err(|err| RepoError::InvalidData(format!("posts row {id}: {err}")))
}
