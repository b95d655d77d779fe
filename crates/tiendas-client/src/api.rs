//! # Store API Client
//!
//! Typed calls for the REST endpoints the storefront and admin panel use.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/subcategorias/categoria/:id   subcategories_for_category   │
//! │  GET    /api/pedidos/usuario/:id           orders_for_user              │
//! │  PATCH  /api/pedidos/:id/estado-pago       update_payment_status        │
//! │  POST   /api/usuarios/otp/solicitar        request_otp                  │
//! │  GET    /api/master-table                  list_master_records          │
//! │  POST   /api/master-table                  create_master_record         │
//! │  PUT    /api/master-table/:id              update_master_record         │
//! │  DELETE /api/master-table/:id              delete_master_record         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are independent: nothing orders them relative to each other,
//! and nothing is retried.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tiendas_core::validation::{validate_email, validate_name, validate_unique_name, MASTER_RECORD_NAME};
use tiendas_core::{CatalogRecord, Order, PaymentStatus};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Wire Types
// =============================================================================

/// A subcategory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub nombre: String,
    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct PaymentStatusBody {
    #[serde(rename = "estadoPago")]
    payment_status: PaymentStatus,
}

#[derive(Debug, Serialize)]
struct OtpRequestBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct MasterRecordBody<'a> {
    nombre: &'a str,
}

/// Error body shapes the API uses: `{ "message": ... }` or `{ "error": ... }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Result of [`StoreClient::confirm_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The PATCH was sent.
    Confirmed,
    /// The order was already paid; nothing was written.
    AlreadyPaid,
}

// =============================================================================
// Store Client
// =============================================================================

/// HTTP client bound to one store API.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl StoreClient {
    /// Creates a client from explicit configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(StoreClient { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Subcategories under a category, for the storefront filter sidebar.
    pub async fn subcategories_for_category(&self, category_id: i64) -> ClientResult<Vec<Subcategory>> {
        let path = format!("/api/subcategorias/categoria/{category_id}");
        self.send_json(self.http.get(self.config.endpoint(&path)), &path)
            .await
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Order history for a user.
    pub async fn orders_for_user(&self, user_id: i64) -> ClientResult<Vec<Order>> {
        let path = format!("/api/pedidos/usuario/{user_id}");
        let orders: Vec<Order> = self
            .send_json(self.http.get(self.config.endpoint(&path)), &path)
            .await?;

        debug!(user_id, count = orders.len(), "Orders loaded");
        Ok(orders)
    }

    /// Sets an order's payment status.
    pub async fn update_payment_status(&self, order_id: i64, status: PaymentStatus) -> ClientResult<()> {
        let path = format!("/api/pedidos/{order_id}/estado-pago");
        let request = self
            .http
            .patch(self.config.endpoint(&path))
            .json(&PaymentStatusBody {
                payment_status: status,
            });

        self.send(request, &path).await?;
        info!(order_id, ?status, "Payment status updated");
        Ok(())
    }

    /// Marks an order as paid unless it already is.
    ///
    /// This is a read followed by a conditional write with no transaction
    /// around it: two confirmations racing on the same order can both write.
    pub async fn confirm_payment(&self, user_id: i64, order_id: i64) -> ClientResult<ConfirmOutcome> {
        let orders = self.orders_for_user(user_id).await?;
        let order = orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| ClientError::NotFound {
                entity: "Order".to_string(),
                id: order_id.to_string(),
            })?;

        if order.payment_status.is_paid() {
            debug!(order_id, "Order already paid, skipping update");
            return Ok(ConfirmOutcome::AlreadyPaid);
        }

        self.update_payment_status(order_id, PaymentStatus::Paid)
            .await?;
        Ok(ConfirmOutcome::Confirmed)
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Asks the API to e-mail a one-time login code.
    ///
    /// The address is validated locally first; an invalid one never leaves
    /// the client.
    pub async fn request_otp(&self, email: &str) -> ClientResult<()> {
        let email = validate_email(email)?;
        let path = "/api/usuarios/otp/solicitar";
        let request = self
            .http
            .post(self.config.endpoint(path))
            .json(&OtpRequestBody { email: &email });

        self.send(request, path).await?;
        info!("OTP requested");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Master table
    // -------------------------------------------------------------------------

    pub async fn list_master_records(&self) -> ClientResult<Vec<CatalogRecord>> {
        let path = "/api/master-table";
        self.send_json(self.http.get(self.config.endpoint(path)), path)
            .await
    }

    /// Creates a record after checking the name format and that no existing
    /// record already uses it.
    pub async fn create_master_record(&self, nombre: &str) -> ClientResult<CatalogRecord> {
        validate_name(nombre, &MASTER_RECORD_NAME)?;
        let existing = self.list_master_records().await?;
        validate_unique_name(nombre, &existing, None)?;

        let path = "/api/master-table";
        let request = self
            .http
            .post(self.config.endpoint(path))
            .json(&MasterRecordBody {
                nombre: nombre.trim(),
            });

        let record: CatalogRecord = self.send_json(request, path).await?;
        info!(id = record.id, "Master record created");
        Ok(record)
    }

    /// Renames a record; the record's own current name does not count as a
    /// duplicate.
    pub async fn update_master_record(&self, id: i64, nombre: &str) -> ClientResult<CatalogRecord> {
        validate_name(nombre, &MASTER_RECORD_NAME)?;
        let existing = self.list_master_records().await?;
        validate_unique_name(nombre, &existing, Some(id))?;

        let path = format!("/api/master-table/{id}");
        let request = self
            .http
            .put(self.config.endpoint(&path))
            .json(&MasterRecordBody {
                nombre: nombre.trim(),
            });

        let record: CatalogRecord = self.send_json(request, &path).await?;
        info!(id, "Master record updated");
        Ok(record)
    }

    pub async fn delete_master_record(&self, id: i64) -> ClientResult<()> {
        let path = format!("/api/master-table/{id}");
        self.send(self.http.delete(self.config.endpoint(&path)), &path)
            .await?;
        info!(id, "Master record deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    /// Sends a request and decodes a success body as JSON.
    ///
    /// A body that does not decode is [`ClientError::Decode`], not a
    /// transport failure: the API did answer.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> ClientResult<T> {
        let response = self.send(request, path).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| {
            warn!(path, error = %source, "Undecodable response body");
            ClientError::Decode {
                path: path.to_string(),
                source,
            }
        })
    }

    /// Sends a request and turns non-success statuses into
    /// [`ClientError::Status`].
    async fn send(&self, request: RequestBuilder, path: &str) -> ClientResult<Response> {
        debug!(path, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        warn!(path, status = status.as_u16(), %message, "API error");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
