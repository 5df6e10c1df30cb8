//! Email notifications for the sale workflow.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Delivery is
//! best-effort: callers log failures and move on, so a broken SMTP relay can
//! never fail a sale. When no SMTP host is configured, [`NullNotifier`] drops
//! each message with a debug log instead.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use quitanda_core::Email;

use crate::config::EmailConfig;
use crate::models::{Sale, Store};

/// HTML template for the sale completion email.
#[derive(Template)]
#[template(path = "email/sale_completed.html")]
struct SaleCompletedEmailHtml<'a> {
    store_name: &'a str,
    fruit: &'a str,
    quantity: i64,
    unit_value: String,
    total: String,
}

/// Plain text template for the sale completion email.
#[derive(Template)]
#[template(path = "email/sale_completed.txt")]
struct SaleCompletedEmailText<'a> {
    store_name: &'a str,
    fruit: &'a str,
    quantity: i64,
    unit_value: String,
    total: String,
}

/// HTML template for the low stock warning email.
#[derive(Template)]
#[template(path = "email/low_stock.html")]
struct LowStockEmailHtml<'a> {
    store_name: &'a str,
    fruit: &'a str,
    remaining: i64,
}

/// Plain text template for the low stock warning email.
#[derive(Template)]
#[template(path = "email/low_stock.txt")]
struct LowStockEmailText<'a> {
    store_name: &'a str,
    fruit: &'a str,
    remaining: i64,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Outbound notifications fired by the sale workflow.
///
/// The trait exists so tests can swap in a recording double; production code
/// uses [`EmailNotifier`] or [`NullNotifier`].
#[async_trait]
pub trait SaleNotifier: Send + Sync {
    /// Tell the store owner a sale went through.
    async fn sale_completed(&self, to: &Email, store: &Store, sale: &Sale)
    -> Result<(), EmailError>;

    /// Warn the store owner that stock of a fruit has run low.
    async fn low_stock(
        &self,
        to: &Email,
        store: &Store,
        fruit: &str,
        remaining: i64,
    ) -> Result<(), EmailError>;
}

/// SMTP-backed notifier.
#[derive(Clone)]
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailNotifier {
    /// Create a new notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[async_trait]
impl SaleNotifier for EmailNotifier {
    async fn sale_completed(
        &self,
        to: &Email,
        store: &Store,
        sale: &Sale,
    ) -> Result<(), EmailError> {
        let unit_value = format_brl(sale.unit_value_cents);
        let total = format_brl(sale.total_cents());

        let html = SaleCompletedEmailHtml {
            store_name: &store.name,
            fruit: &sale.fruit,
            quantity: sale.quantity,
            unit_value: unit_value.clone(),
            total: total.clone(),
        }
        .render()?;
        let text = SaleCompletedEmailText {
            store_name: &store.name,
            fruit: &sale.fruit,
            quantity: sale.quantity,
            unit_value,
            total,
        }
        .render()?;

        self.send_multipart_email(to.as_str(), "Sale completed", &text, &html)
            .await
    }

    async fn low_stock(
        &self,
        to: &Email,
        store: &Store,
        fruit: &str,
        remaining: i64,
    ) -> Result<(), EmailError> {
        let html = LowStockEmailHtml {
            store_name: &store.name,
            fruit,
            remaining,
        }
        .render()?;
        let text = LowStockEmailText {
            store_name: &store.name,
            fruit,
            remaining,
        }
        .render()?;

        self.send_multipart_email(to.as_str(), &format!("Low stock alert: {fruit}"), &text, &html)
            .await
    }
}

/// Notifier used when SMTP is not configured; drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl SaleNotifier for NullNotifier {
    async fn sale_completed(
        &self,
        to: &Email,
        _store: &Store,
        sale: &Sale,
    ) -> Result<(), EmailError> {
        tracing::debug!(to = %to, fruit = %sale.fruit, "Email disabled, dropping sale notification");
        Ok(())
    }

    async fn low_stock(
        &self,
        to: &Email,
        _store: &Store,
        fruit: &str,
        remaining: i64,
    ) -> Result<(), EmailError> {
        tracing::debug!(to = %to, fruit = %fruit, remaining, "Email disabled, dropping low stock warning");
        Ok(())
    }
}

/// Format a cent amount as Brazilian currency, e.g. `R$ 12,34`.
fn format_brl(cents: i64) -> String {
    format!("R$ {},{:02}", cents / 100, cents.rem_euclid(100))
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0), "R$ 0,00");
        assert_eq!(format_brl(5), "R$ 0,05");
        assert_eq!(format_brl(1234), "R$ 12,34");
        assert_eq!(format_brl(350_000), "R$ 3500,00");
    }

    #[test]
    fn test_sale_completed_template_renders() {
        let text = SaleCompletedEmailText {
            store_name: "Quitanda do Porto",
            fruit: "Banana",
            quantity: 12,
            unit_value: format_brl(150),
            total: format_brl(1800),
        }
        .render()
        .unwrap();

        assert!(text.contains("Quitanda do Porto"));
        assert!(text.contains("Banana"));
        assert!(text.contains("R$ 18,00"));
    }

    #[test]
    fn test_low_stock_template_renders() {
        let html = LowStockEmailHtml {
            store_name: "Quitanda do Porto",
            fruit: "Apple",
            remaining: 5,
        }
        .render()
        .unwrap();

        assert!(html.contains("Apple"));
        assert!(html.contains('5'));
    }
}
