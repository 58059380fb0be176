use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use steward_application::RoleRepository;
use steward_core::{AppError, RoleId};
use steward_domain::{Role, RoleListQuery, RoleSortField, SortDirection};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::{HttpRoleRepository, decode_envelope};

/// Serves one canned HTTP response and returns the base URL plus the raw
/// request line received.
async fn serve_once(status: u16, body: String) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr().unwrap_or_else(|_| unreachable!());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap_or_else(|_| unreachable!());
        let mut buffer = vec![0_u8; 8192];
        let read = stream.read(&mut buffer).await.unwrap_or_default();
        let request = String::from_utf8_lossy(&buffer[..read]).into_owned();

        let response = format!(
            "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        request.lines().next().unwrap_or_default().to_owned()
    });

    (format!("http://{address}"), handle)
}

fn repository(base_url: &str) -> HttpRoleRepository {
    HttpRoleRepository::connect(base_url, Duration::from_secs(5)).unwrap_or_else(|_| unreachable!())
}

#[test]
fn list_url_carries_query_parameters() {
    let repository = repository("http://localhost:3001/backend");
    let url = repository.list_url(&RoleListQuery {
        search: Some("fin ance".to_owned()),
        sort_by: RoleSortField::UpdatedAt,
        sort_order: SortDirection::Desc,
        page: 2,
        limit: 25,
    });

    assert_eq!(
        url.map(|url| url.to_string()),
        Ok(
            "http://localhost:3001/backend/api/roles?search=fin+ance&sort_by=updated_at&sort_order=desc&page=2&limit=25"
                .to_owned()
        )
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = HttpRoleRepository::connect("not a url", Duration::from_secs(1));
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn non_envelope_error_body_maps_status() {
    let result = decode_envelope::<Role>(StatusCode::CONFLICT, "duplicate");
    assert_eq!(result, Err(AppError::Conflict("duplicate".to_owned())));

    let result = decode_envelope::<Role>(StatusCode::BAD_GATEWAY, "");
    assert!(matches!(result, Err(AppError::Network(_))));
}

#[test]
fn unreadable_success_body_is_internal() {
    let result = decode_envelope::<Role>(StatusCode::OK, "<html>");
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr().unwrap_or_else(|_| unreachable!());
    drop(listener);

    let result = repository(&format!("http://{address}"))
        .list_roles(&RoleListQuery::default())
        .await;

    assert!(matches!(result, Err(AppError::Network(_))));
}

#[tokio::test]
async fn list_decodes_page_envelope() {
    let body = json!({
        "success": true,
        "data": { "roles": [], "total": 0, "page": 1, "limit": 10 }
    })
    .to_string();
    let (base_url, request) = serve_once(200, body).await;

    let page = repository(&base_url)
        .list_roles(&RoleListQuery::default())
        .await;

    assert_eq!(page.map(|page| page.total), Ok(0));
    let request_line = request.await.unwrap_or_default();
    assert!(request_line.starts_with("GET /api/roles?"));
}

#[tokio::test]
async fn find_maps_not_found_to_none() {
    let body = json!({ "success": false, "message": "role does not exist" }).to_string();
    let (base_url, _request) = serve_once(404, body).await;

    let found = repository(&base_url).find_role(RoleId::new()).await;

    assert_eq!(found, Ok(None));
}

#[tokio::test]
async fn validation_failure_keeps_backend_messages() {
    let body = json!({
        "success": false,
        "message": "role is invalid",
        "errors": ["unknown resource 'vault'"]
    })
    .to_string();
    let (base_url, _request) = serve_once(422, body).await;

    let result = repository(&base_url).delete_role(RoleId::new()).await;

    assert_eq!(
        result,
        Err(AppError::Validation(
            "role is invalid: unknown resource 'vault'".to_owned()
        ))
    );
}

#[tokio::test]
async fn delete_accepts_empty_success_envelope() {
    let body = json!({ "success": true, "message": "role deleted" }).to_string();
    let (base_url, request) = serve_once(200, body).await;

    let result = repository(&base_url).delete_role(RoleId::new()).await;

    assert_eq!(result, Ok(()));
    let request_line = request.await.unwrap_or_default();
    assert!(request_line.starts_with("DELETE /api/roles/"));
}
