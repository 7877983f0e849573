//! Postgres record store

use async_trait::async_trait;
use cotacoes_core::ports::RecordStore;
use cotacoes_core::{AtualizaCotacao, Cotacao, CotacaoError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub struct PostgresStore {
    pool: PgPool,
}

fn db_err(e: sqlx::Error) -> CotacaoError {
    CotacaoError::Database(e.to_string())
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to Postgres...");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(db_err)?;

        tracing::info!("Postgres connection established, running migrations...");

        Self::run_migrations(&pool).await?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cotacoes (
                id TEXT PRIMARY KEY,
                responsavel_cotacao TEXT NOT NULL,
                transportadora TEXT NOT NULL,
                destino TEXT,
                valor_frete DOUBLE PRECISION NOT NULL,
                nota_fiscal TEXT,
                prazo_entrega TEXT,
                canal_comunicacao TEXT,
                codigo_coleta TEXT,
                contato_transportadora TEXT,
                data_cotacao TEXT,
                observacoes TEXT,
                negocio_fechado BOOLEAN NOT NULL DEFAULT FALSE,
                criado_em TIMESTAMPTZ NOT NULL DEFAULT now(),
                atualizado_em TIMESTAMPTZ
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn list(&self) -> Result<Vec<Cotacao>> {
        let rows: Vec<CotacaoRow> = sqlx::query_as(
            r#"
            SELECT id, responsavel_cotacao, transportadora, destino, valor_frete,
                   nota_fiscal, prazo_entrega, canal_comunicacao, codigo_coleta,
                   contato_transportadora, data_cotacao, observacoes,
                   negocio_fechado, criado_em, atualizado_em
            FROM cotacoes
            ORDER BY criado_em DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Cotacao>> {
        let row: Option<CotacaoRow> = sqlx::query_as(
            r#"
            SELECT id, responsavel_cotacao, transportadora, destino, valor_frete,
                   nota_fiscal, prazo_entrega, canal_comunicacao, codigo_coleta,
                   contato_transportadora, data_cotacao, observacoes,
                   negocio_fechado, criado_em, atualizado_em
            FROM cotacoes WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn insert(&self, cotacao: &Cotacao) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cotacoes (id, responsavel_cotacao, transportadora, destino,
                                  valor_frete, nota_fiscal, prazo_entrega,
                                  canal_comunicacao, codigo_coleta,
                                  contato_transportadora, data_cotacao, observacoes,
                                  negocio_fechado, criado_em, atualizado_em)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(&cotacao.id)
        .bind(&cotacao.responsavel_cotacao)
        .bind(&cotacao.transportadora)
        .bind(&cotacao.destino)
        .bind(cotacao.valor_frete)
        .bind(&cotacao.nota_fiscal)
        .bind(&cotacao.prazo_entrega)
        .bind(&cotacao.canal_comunicacao)
        .bind(&cotacao.codigo_coleta)
        .bind(&cotacao.contato_transportadora)
        .bind(&cotacao.data_cotacao)
        .bind(&cotacao.observacoes)
        .bind(cotacao.negocio_fechado)
        .bind(cotacao.timestamp)
        .bind(cotacao.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn update(&self, id: &str, patch: AtualizaCotacao) -> Result<Option<Cotacao>> {
        // Partial replacement: omitted fields keep their stored value.
        // Identifier and criado_em are never touched.
        let row: Option<CotacaoRow> = sqlx::query_as(
            r#"
            UPDATE cotacoes SET
                responsavel_cotacao = COALESCE($2, responsavel_cotacao),
                transportadora = COALESCE($3, transportadora),
                destino = COALESCE($4, destino),
                valor_frete = COALESCE($5, valor_frete),
                nota_fiscal = COALESCE($6, nota_fiscal),
                prazo_entrega = COALESCE($7, prazo_entrega),
                canal_comunicacao = COALESCE($8, canal_comunicacao),
                codigo_coleta = COALESCE($9, codigo_coleta),
                contato_transportadora = COALESCE($10, contato_transportadora),
                data_cotacao = COALESCE($11, data_cotacao),
                observacoes = COALESCE($12, observacoes),
                negocio_fechado = COALESCE($13, negocio_fechado),
                atualizado_em = now()
            WHERE id = $1
            RETURNING id, responsavel_cotacao, transportadora, destino, valor_frete,
                      nota_fiscal, prazo_entrega, canal_comunicacao, codigo_coleta,
                      contato_transportadora, data_cotacao, observacoes,
                      negocio_fechado, criado_em, atualizado_em
            "#,
        )
        .bind(id)
        .bind(patch.responsavel_cotacao)
        .bind(patch.transportadora)
        .bind(patch.destino)
        .bind(patch.valor_frete)
        .bind(patch.nota_fiscal)
        .bind(patch.prazo_entrega)
        .bind(patch.canal_comunicacao)
        .bind(patch.codigo_coleta)
        .bind(patch.contato_transportadora)
        .bind(patch.data_cotacao)
        .bind(patch.observacoes)
        .bind(patch.negocio_fechado)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cotacoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct CotacaoRow {
    id: String,
    responsavel_cotacao: String,
    transportadora: String,
    destino: Option<String>,
    valor_frete: f64,
    nota_fiscal: Option<String>,
    prazo_entrega: Option<String>,
    canal_comunicacao: Option<String>,
    codigo_coleta: Option<String>,
    contato_transportadora: Option<String>,
    data_cotacao: Option<String>,
    observacoes: Option<String>,
    negocio_fechado: bool,
    criado_em: chrono::DateTime<chrono::Utc>,
    atualizado_em: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<CotacaoRow> for Cotacao {
    fn from(r: CotacaoRow) -> Self {
        Cotacao {
            id: r.id,
            responsavel_cotacao: r.responsavel_cotacao,
            transportadora: r.transportadora,
            destino: r.destino,
            valor_frete: r.valor_frete,
            nota_fiscal: r.nota_fiscal,
            prazo_entrega: r.prazo_entrega,
            canal_comunicacao: r.canal_comunicacao,
            codigo_coleta: r.codigo_coleta,
            contato_transportadora: r.contato_transportadora,
            data_cotacao: r.data_cotacao,
            observacoes: r.observacoes,
            negocio_fechado: r.negocio_fechado,
            timestamp: r.criado_em,
            updated_at: r.atualizado_em,
        }
    }
}
