use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::export::{ExportArtifact, ExportError, ExportOptions, Exporter};
use crate::render::RenderedResume;

/// Sends the rendered HTML to an external HTML-to-PDF service and archives the
/// result in S3.
#[derive(Clone)]
pub struct RenderServiceExporter {
    http: Client,
    endpoint: String,
    s3: aws_sdk_s3::Client,
    bucket: String,
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    element_id: &'a str,
    filename: &'a str,
    options: &'a ExportOptions,
}

impl RenderServiceExporter {
    pub fn new(endpoint: String, s3: aws_sdk_s3::Client, bucket: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            endpoint,
            s3,
            bucket,
        }
    }

    /// Keeps a copy of the PDF in S3. A failed upload only costs the copy;
    /// the caller still gets the document.
    async fn archive(&self, user_id: Uuid, filename: &str, content: &Bytes) -> Option<String> {
        let key = format!("exports/{user_id}/{}/{filename}", Uuid::new_v4());
        let uploaded = self
            .s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(content.clone()))
            .content_type("application/pdf")
            .send()
            .await;

        match uploaded {
            Ok(_) => {
                info!("Archived export to s3://{}/{}", self.bucket, key);
                Some(key)
            }
            Err(e) => {
                warn!(
                    "Could not archive {filename} for user {user_id}: {}",
                    DisplayErrorContext(&e)
                );
                None
            }
        }
    }
}

#[async_trait]
impl Exporter for RenderServiceExporter {
    async fn export(
        &self,
        user_id: Uuid,
        target: &RenderedResume,
        filename: &str,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError> {
        if target.html.trim().is_empty() {
            return Err(ExportError::MissingTarget(target.element_id));
        }

        debug!(
            "Requesting PDF for {filename} ({} template, {} bytes of HTML)",
            target.template,
            target.html.len()
        );
        let response = self
            .http
            .post(&self.endpoint)
            .json(&RenderRequest {
                html: &target.html,
                element_id: target.element_id,
                filename,
                options,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Rasterize(format!("status {status}: {body}")));
        }
        let content = response.bytes().await?;

        let archive_key = self.archive(user_id, filename, &content).await;

        Ok(ExportArtifact {
            filename: filename.to_string(),
            content,
            archive_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::retry::RetryConfig;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use axum::{routing::post, Router};

    use crate::models::resume::{ResumeDocument, TemplateId};
    use crate::render::render_document;

    const FAKE_PDF: &[u8] = b"%PDF-1.4 fake";

    /// Serves a render endpoint that answers every request with `FAKE_PDF`.
    async fn spawn_renderer() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/render", post(|| async { FAKE_PDF }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/render")
    }

    /// S3 client pointed at a port nothing listens on.
    fn unreachable_s3() -> aws_sdk_s3::Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }

    #[tokio::test]
    async fn test_archive_failure_still_returns_pdf() {
        let exporter =
            RenderServiceExporter::new(spawn_renderer().await, unreachable_s3(), "exports".into());
        let rendered = render_document(&ResumeDocument::default(), TemplateId::Modern);

        let artifact = exporter
            .export(
                Uuid::new_v4(),
                &rendered,
                "resume.pdf",
                &ExportOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(artifact.filename, "resume.pdf");
        assert_eq!(artifact.content.as_ref(), FAKE_PDF);
        assert_eq!(artifact.archive_key, None);
    }

    #[tokio::test]
    async fn test_renderer_error_fails_export() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/render",
            post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let exporter = RenderServiceExporter::new(
            format!("http://{addr}/render"),
            unreachable_s3(),
            "exports".into(),
        );
        let rendered = render_document(&ResumeDocument::default(), TemplateId::Modern);
        let result = exporter
            .export(
                Uuid::new_v4(),
                &rendered,
                "resume.pdf",
                &ExportOptions::default(),
            )
            .await;

        assert!(matches!(result, Err(ExportError::Rasterize(_))));
    }
}
