use futures::future::BoxFuture;
use sea_orm::{
    ActiveValue::Set,
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Order, QueryOrder, QuerySelect,
    sea_query::{ColumnDef, Expr, Func, SimpleExpr, Table},
};
use tracing::{debug, info};

use super::{
    config::SqlConfig,
    entities::{leaderboard, question},
    error::{SqlDaoError, SqlResult},
};
use crate::dao::{
    models::{LeaderboardEntity, NewLeaderboardEntity, QuestionEntity},
    quiz_store::QuizStore,
    storage::StorageResult,
};

const LEADERBOARD_TABLE: &str = "leaderboard";

/// [`QuizStore`] backed by a sea-orm connection pool.
#[derive(Clone)]
pub struct SqlQuizStore {
    db: DatabaseConnection,
}

impl SqlQuizStore {
    /// Open the connection pool. The `leaderboard` table is not touched; call
    /// [`SqlQuizStore::ensure_leaderboard_table`] once connected.
    pub async fn connect(config: &SqlConfig) -> SqlResult<Self> {
        let db = Database::connect(config.connect_options())
            .await
            .map_err(|source| SqlDaoError::Connect { source })?;
        info!("connected to the database");
        Ok(Self { db })
    }

    /// Wrap an already open connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying connection, used to seed fixtures.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create the `leaderboard` table when it does not exist yet.
    pub async fn ensure_leaderboard_table(&self) -> SqlResult<()> {
        let statement = Table::create()
            .table(leaderboard::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(leaderboard::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(leaderboard::Column::TeamName)
                    .string_len(255)
                    .not_null(),
            )
            .col(
                ColumnDef::new(leaderboard::Column::MemberNames)
                    .text()
                    .not_null(),
            )
            .col(ColumnDef::new(leaderboard::Column::Score).integer().not_null())
            .col(
                ColumnDef::new(leaderboard::Column::CreatedAt)
                    .timestamp()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .to_owned();

        let backend = self.db.get_database_backend();
        self.db
            .execute(backend.build(&statement))
            .await
            .map_err(|source| SqlDaoError::EnsureTable {
                table: LEADERBOARD_TABLE,
                source,
            })?;
        debug!(table = LEADERBOARD_TABLE, "table created or already present");
        Ok(())
    }

    async fn random_questions(&self, limit: u64) -> SqlResult<Vec<QuestionEntity>> {
        let rows = question::Entity::find()
            .order_by(SimpleExpr::from(Func::random()), Order::Asc)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|source| SqlDaoError::FetchQuestions { source })?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn top_leaderboard(&self, limit: u64) -> SqlResult<Vec<LeaderboardEntity>> {
        let rows = leaderboard::Entity::find()
            .order_by_desc(leaderboard::Column::Score)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|source| SqlDaoError::FetchLeaderboard { source })?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn append_leaderboard(&self, entry: NewLeaderboardEntity) -> SqlResult<i32> {
        let NewLeaderboardEntity {
            team_name,
            member_names,
            score,
        } = entry;

        let model = leaderboard::ActiveModel {
            team_name: Set(team_name.clone()),
            member_names: Set(member_names),
            score: Set(score),
            ..Default::default()
        };

        let inserted = leaderboard::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|source| SqlDaoError::AppendLeaderboard { team_name, source })?;
        Ok(inserted.last_insert_id)
    }

    async fn ping(&self) -> SqlResult<()> {
        self.db
            .ping()
            .await
            .map_err(|source| SqlDaoError::HealthPing { source })
    }
}

impl QuizStore for SqlQuizStore {
    fn random_questions(
        &self,
        limit: u64,
    ) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.random_questions(limit).await.map_err(Into::into) })
    }

    fn top_leaderboard(
        &self,
        limit: u64,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaderboardEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.top_leaderboard(limit).await.map_err(Into::into) })
    }

    fn append_leaderboard(
        &self,
        entry: NewLeaderboardEntity,
    ) -> BoxFuture<'static, StorageResult<i32>> {
        let store = self.clone();
        Box::pin(async move { store.append_leaderboard(entry).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
