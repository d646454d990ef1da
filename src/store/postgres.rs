use async_trait::async_trait;
use sqlx::PgPool;

use super::{ContentStore, StoreError};
use crate::models::{
    category::Category,
    post::{NewPost, PostFields, PostQuery, PostRow},
    subscriber::Subscriber,
    user::{NewUser, Profile, User},
};

/// Posts joined with the category and author columns `PostRow` expects.
const POST_SELECT: &str = r#"
    SELECT
        p.id, p.title, p.slug, p.excerpt, p.content, p.cover_image,
        p.category_id, p.author_id, p.published, p.featured, p.read_time,
        p.created_at, p.updated_at,
        c.name AS category_name, c.slug AS category_slug,
        pr.display_name AS author_name, pr.bio AS author_bio
    FROM posts p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN profiles pr ON pr.id = p.author_id
"#;

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Maps Postgres unique violations (SQLSTATE 23505) to `UniqueViolation`.
fn unique_as(subject: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::UniqueViolation(subject.to_string())
        }
        _ => StoreError::from(err),
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn published_posts(&self, query: &PostQuery) -> Result<Vec<PostRow>, StoreError> {
        let sql = format!(
            r#"{POST_SELECT}
            WHERE p.published
              AND ($1::TEXT IS NULL OR c.slug = $1)
            ORDER BY p.created_at DESC
            LIMIT $2
            "#
        );

        let posts = sqlx::query_as::<_, PostRow>(&sql)
            .bind(query.category_slug.as_deref())
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn has_published_posts(&self) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE published)")
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<PostRow>, StoreError> {
        let sql = format!("{POST_SELECT} WHERE p.id = $1");
        let post = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<PostRow>, StoreError> {
        let sql = format!("{POST_SELECT} WHERE p.slug = $1");
        let post = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn posts_by_author(&self, author_id: i64) -> Result<Vec<PostRow>, StoreError> {
        let sql = format!("{POST_SELECT} WHERE p.author_id = $1 ORDER BY p.created_at DESC");
        let posts = sqlx::query_as::<_, PostRow>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn insert_post(&self, post: NewPost) -> Result<PostRow, StoreError> {
        let fields = post.fields;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts
            (title, slug, excerpt, content, cover_image, category_id, author_id, published, read_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&fields.title)
        .bind(&post.slug)
        .bind(&fields.excerpt)
        .bind(&fields.content)
        .bind(&fields.cover_image)
        .bind(fields.category_id)
        .bind(post.author_id)
        .bind(fields.published)
        .bind(fields.read_time)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_as("slug"))?;

        self.post_by_id(id)
            .await?
            .ok_or_else(|| StoreError::Backend(format!("post {} missing after insert", id)))
    }

    async fn replace_post(&self, id: i64, fields: PostFields) -> Result<Option<PostRow>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $1, excerpt = $2, content = $3, cover_image = $4,
                category_id = $5, published = $6, read_time = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.excerpt)
        .bind(&fields.content)
        .bind(&fields.cover_image)
        .bind(fields.category_id)
        .bind(fields.published)
        .bind(fields.read_time)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.post_by_id(id).await
    }

    async fn categories(&self, limit: Option<i64>) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description FROM categories ORDER BY name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn insert_user(&self, user: NewUser) -> Result<(User, Profile), StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(unique_as("username"))?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, display_name, bio)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, display_name, bio
            "#,
        )
        .bind(created.id)
        .bind(&user.display_name)
        .bind(&user.bio)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((created, profile))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn profile_for_user(&self, user_id: i64) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, user_id, display_name, bio FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn insert_subscriber(&self, email: &str) -> Result<Subscriber, StoreError> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            "INSERT INTO subscribers (email) VALUES ($1) RETURNING id, email, created_at",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_as("email"))?;
        Ok(subscriber)
    }
}
