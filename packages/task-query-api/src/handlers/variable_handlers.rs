//! Task variable query handlers.

use hyper::{body::Bytes, Request, Response};
use task_query_core::PageRequest;

use crate::router::{AppState, RouterError};

use super::envelope::{render, LinkBuilder};
use super::negotiation::negotiate;
use super::request_utils::{
    base_url, build_response, caller_context, decode_path_param, parse_query_pairs,
    MatchitParams,
};

/// Lists the variables of a task, one page at a time.
///
/// # Endpoint
/// `GET /v1/tasks/{taskId}/variables`
///
/// # Query Parameters
/// Either style, never both:
/// - `skipCount`, `maxItems`: offset and count
/// - `page`, `size`: zero-based page index and page size
///
/// Optional `sort=field[,asc|desc]` with `id`, `name`, `createTime` or
/// `lastUpdatedTime`.
///
/// # Response
/// - **200 OK** with `Accept: application/json`
/// ```json
/// {
///   "list": {
///     "entries": [
///       { "entry": { "id": 1, "type": "java.lang.String", "name": "firstName", "taskId": "t1", "value": "John" } }
///     ],
///     "pagination": { "skipCount": 11, "maxItems": 10, "count": 1, "hasMoreItems": false, "totalItems": 12 }
///   }
/// }
/// ```
/// - **200 OK** with `Accept: application/hal+json`
/// ```json
/// {
///   "_embedded": { "variables": [ { "id": 1, "name": "firstName", "_links": { "task": { "href": "..." } } } ] },
///   "_links": { "first": { "href": "..." }, "self": { "href": "..." }, "last": { "href": "..." } },
///   "page": { "size": 10, "totalElements": 11, "totalPages": 2, "number": 1 }
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: invalid task id or pagination parameters
/// - **403 Forbidden**: caller may not see this task's variables
/// - **406 Not Acceptable**: neither JSON format is accepted
/// - **503 Service Unavailable**: variable store failure or timeout
///
/// # Examples
/// ```bash
/// curl -H "Accept: application/json" \
///   "http://localhost:8080/v1/tasks/t1/variables?skipCount=11&maxItems=10"
///
/// curl -H "Accept: application/hal+json" \
///   "http://localhost:8080/v1/tasks/t1/variables?page=1&size=10"
/// ```
pub async fn list_task_variables<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let task_id = decode_path_param(params.get("task_id").unwrap_or_default())?;

    // Negotiate first so an unacceptable request never reaches the store
    let format = negotiate(req.headers(), state.config.default_format)?;

    let pairs = parse_query_pairs(req.uri().query());
    let (page_request, sort) =
        PageRequest::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let caller = caller_context(req.headers());
    let links = LinkBuilder::new(&base_url(&state.config, req.headers()), &task_id);

    let service = state.service.clone();
    let page = tokio::task::spawn_blocking(move || {
        service.list_task_variables(&caller, &task_id, page_request, sort)
    })
    .await
    .map_err(|e| RouterError::InternalError(format!("Query task failed: {}", e)))??;

    let json = render(format, &page, &links)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;

    build_response(200, format.media_type(), json)
}
