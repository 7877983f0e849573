//! Freight-quote record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted freight quote.
///
/// `id` and `timestamp` are server-assigned at creation and immutable
/// afterwards. `updated_at` is present if and only if the record has been
/// modified at least once since creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cotacao {
    pub id: String,
    pub responsavel_cotacao: String,
    pub transportadora: String,
    pub destino: Option<String>,
    pub valor_frete: f64,
    pub nota_fiscal: Option<String>,
    pub prazo_entrega: Option<String>,
    pub canal_comunicacao: Option<String>,
    pub codigo_coleta: Option<String>,
    pub contato_transportadora: Option<String>,
    pub data_cotacao: Option<String>,
    pub observacoes: Option<String>,
    pub negocio_fechado: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create payload. Carries business fields only - any client-supplied
/// `id` or `timestamp` is dropped during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovaCotacao {
    pub responsavel_cotacao: String,
    pub transportadora: String,
    #[serde(default)]
    pub destino: Option<String>,
    pub valor_frete: f64,
    #[serde(default)]
    pub nota_fiscal: Option<String>,
    #[serde(default)]
    pub prazo_entrega: Option<String>,
    #[serde(default)]
    pub canal_comunicacao: Option<String>,
    #[serde(default)]
    pub codigo_coleta: Option<String>,
    #[serde(default)]
    pub contato_transportadora: Option<String>,
    #[serde(default)]
    pub data_cotacao: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub negocio_fechado: bool,
}

/// Update payload. Every field optional; omitted fields keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtualizaCotacao {
    #[serde(default)]
    pub responsavel_cotacao: Option<String>,
    #[serde(default)]
    pub transportadora: Option<String>,
    #[serde(default)]
    pub destino: Option<String>,
    #[serde(default)]
    pub valor_frete: Option<f64>,
    #[serde(default)]
    pub nota_fiscal: Option<String>,
    #[serde(default)]
    pub prazo_entrega: Option<String>,
    #[serde(default)]
    pub canal_comunicacao: Option<String>,
    #[serde(default)]
    pub codigo_coleta: Option<String>,
    #[serde(default)]
    pub contato_transportadora: Option<String>,
    #[serde(default)]
    pub data_cotacao: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub negocio_fechado: Option<bool>,
}

impl Cotacao {
    /// Build a new record from a create payload, stamping id and
    /// creation timestamp.
    pub fn new(nova: NovaCotacao) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            responsavel_cotacao: nova.responsavel_cotacao,
            transportadora: nova.transportadora,
            destino: nova.destino,
            valor_frete: nova.valor_frete,
            nota_fiscal: nova.nota_fiscal,
            prazo_entrega: nova.prazo_entrega,
            canal_comunicacao: nova.canal_comunicacao,
            codigo_coleta: nova.codigo_coleta,
            contato_transportadora: nova.contato_transportadora,
            data_cotacao: nova.data_cotacao,
            observacoes: nova.observacoes,
            negocio_fechado: nova.negocio_fechado,
            timestamp: Utc::now(),
            updated_at: None,
        }
    }

    /// Merge an update payload into this record. Identifier and creation
    /// timestamp are preserved; `updated_at` is stamped.
    pub fn apply(&mut self, patch: AtualizaCotacao) {
        if let Some(v) = patch.responsavel_cotacao {
            self.responsavel_cotacao = v;
        }
        if let Some(v) = patch.transportadora {
            self.transportadora = v;
        }
        if let Some(v) = patch.destino {
            self.destino = Some(v);
        }
        if let Some(v) = patch.valor_frete {
            self.valor_frete = v;
        }
        if let Some(v) = patch.nota_fiscal {
            self.nota_fiscal = Some(v);
        }
        if let Some(v) = patch.prazo_entrega {
            self.prazo_entrega = Some(v);
        }
        if let Some(v) = patch.canal_comunicacao {
            self.canal_comunicacao = Some(v);
        }
        if let Some(v) = patch.codigo_coleta {
            self.codigo_coleta = Some(v);
        }
        if let Some(v) = patch.contato_transportadora {
            self.contato_transportadora = Some(v);
        }
        if let Some(v) = patch.data_cotacao {
            self.data_cotacao = Some(v);
        }
        if let Some(v) = patch.observacoes {
            self.observacoes = Some(v);
        }
        if let Some(v) = patch.negocio_fechado {
            self.negocio_fechado = v;
        }
        self.updated_at = Some(Utc::now());
    }
}
