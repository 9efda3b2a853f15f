//! REST implementation of [`ActivityApi`] on a bare hyper HTTP/1.1
//! connection, with rustls for `https` base URLs.

use super::envelope::{self, ListEnvelope};
use super::{ActivityApi, Session};
use crate::errors::{AppError, AppResult};
use crate::models::activity::Activity;
use crate::models::application::{Application, ReviewAction};
use crate::models::checkin::{CheckInReceipt, CheckInRecord};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HOST};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tracing::{debug, warn};

pub struct HttpApi {
    session: Session,
    timeout: Duration,
    tls: TlsConnector,
}

#[derive(Serialize)]
struct ReviewBody<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct CodeBody {
    #[serde(alias = "check_in_code")]
    code: String,
}

impl HttpApi {
    pub fn new(session: Session, timeout: Duration) -> Self {
        let mut root_cert_store = RootCertStore::empty();
        root_cert_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder()
            .with_root_certificates(root_cert_store)
            .with_no_client_auth();

        Self {
            session,
            timeout,
            tls: TlsConnector::from(Arc::new(config)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> AppResult<(StatusCode, Bytes)> {
        let secs = self.timeout.as_secs();
        tokio::time::timeout(self.timeout, self.exchange(method, path, body))
            .await
            .map_err(|_| AppError::Timeout(secs))?
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> AppResult<(StatusCode, Bytes)> {
        let url = self.session.url(path);
        let uri: Uri = url
            .parse()
            .map_err(|e| AppError::InvalidUrl(format!("{url}: {e}")))?;

        let https = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => return Err(AppError::InvalidUrl(format!("{url}: scheme must be http or https"))),
        };
        let host = uri
            .host()
            .ok_or_else(|| AppError::InvalidUrl(format!("{url}: missing host")))?
            .to_string();
        let port = uri.port_u16().unwrap_or(if https { 443 } else { 80 });
        let authority = uri
            .authority()
            .map(|a| a.to_string())
            .unwrap_or_else(|| host.clone());
        let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(target)
            .header(HOST, authority)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(bearer) = self.session.bearer() {
            builder = builder.header(AUTHORIZATION, bearer);
        }
        let request = builder.body(Full::new(Bytes::from(body.unwrap_or_default())))?;

        debug!(%method, %url, "sending request");

        let stream = TcpStream::connect((host.as_str(), port)).await?;
        let (status, bytes) = if https {
            let name = ServerName::try_from(host.clone()).map_err(|e| AppError::Tls(e.to_string()))?;
            let stream = self.tls.connect(name, stream).await?;
            roundtrip(stream, request).await?
        } else {
            roundtrip(stream, request).await?
        };

        debug!(%status, len = bytes.len(), "response received");
        Ok((status, bytes))
    }

    /// Send and turn any non-2xx answer into `AppError::Api` carrying the
    /// backend's message.
    async fn expect_ok(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> AppResult<Bytes> {
        let (status, bytes) = self.send(method, path, body).await?;
        if status.is_success() {
            return Ok(bytes);
        }

        let message = envelope::error_message(&bytes);
        warn!(%status, %message, path, "request rejected");
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let bytes = self.expect_ok(Method::GET, path, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let bytes = self.expect_ok(Method::GET, path, None).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let envelope: ListEnvelope<T> = serde_json::from_slice(&bytes)?;
        if envelope.has_more() {
            warn!(path, "paginated response, only the first page was read");
        }
        Ok(envelope.into_vec())
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let payload = serde_json::to_vec(body)?;
        let bytes = self.expect_ok(Method::POST, path, Some(payload)).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn roundtrip<S>(stream: S, request: Request<Full<Bytes>>) -> AppResult<(StatusCode, Bytes)>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            debug!(%err, "connection closed with error");
        }
    });

    let response = sender.send_request(request).await?;
    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();
    Ok((status, body))
}

impl ActivityApi for HttpApi {
    async fn activity(&self, id: i64) -> AppResult<Activity> {
        self.get_json(&format!("/api/activities/{id}/")).await
    }

    async fn my_applications(&self) -> AppResult<Vec<Application>> {
        self.get_list("/api/activities/applications/").await
    }

    async fn apply(&self, activity_id: i64) -> AppResult<Application> {
        self.post_json("/api/activities/applications/", &json!({ "activity": activity_id }))
            .await
    }

    async fn cancel_application(&self, application_id: i64) -> AppResult<()> {
        self.expect_ok(
            Method::POST,
            &format!("/api/activities/applications/{application_id}/cancel/"),
            None,
        )
        .await?;
        Ok(())
    }

    async fn activity_applications(&self, activity_id: i64) -> AppResult<Vec<Application>> {
        self.get_list(&format!("/api/activities/{activity_id}/applications/"))
            .await
    }

    async fn review_application(
        &self,
        application_id: i64,
        action: ReviewAction,
        reason: Option<String>,
    ) -> AppResult<Application> {
        let body = ReviewBody {
            action: action.as_str(),
            reason,
        };
        self.post_json(
            &format!("/api/activities/applications/{application_id}/review/"),
            &body,
        )
        .await
    }

    async fn checkin_status(&self, activity_id: i64) -> AppResult<Option<CheckInRecord>> {
        let path = format!("/api/activities/{activity_id}/checkin-status/");
        let bytes = match self.expect_ok(Method::GET, &path, None).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        // "no record" comes back as null or as an object without a status
        let value: Value = serde_json::from_slice(&bytes)?;
        match value.get("attendance_status") {
            None | Some(Value::Null) => Ok(None),
            Some(_) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn checkin_list(&self, activity_id: i64) -> AppResult<Vec<CheckInRecord>> {
        self.get_list(&format!("/api/activities/{activity_id}/checkin-list/"))
            .await
    }

    async fn checkin(&self, activity_id: i64, code: &str) -> AppResult<CheckInReceipt> {
        let receipt: Option<CheckInReceipt> = self
            .post_json(
                &format!("/api/activities/{activity_id}/checkin/"),
                &json!({ "code": code }),
            )
            .await?;
        Ok(receipt.unwrap_or_default())
    }

    async fn checkin_code(&self, activity_id: i64) -> AppResult<String> {
        let body: CodeBody = self
            .get_json(&format!("/api/activities/{activity_id}/checkin-code/"))
            .await?;
        Ok(body.code)
    }
}
