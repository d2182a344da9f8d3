//! HTTP service for uploading workbooks to the backend

use gloo_net::http::Request;
use web_sys::{File, FormData};

use crate::types::{AppError, AppResult, UploadResponse};

/// Upload a workbook to the backend as job `job_id`.
///
/// Validation failures come back as 422 with a full [`UploadResponse`]
/// body, so the body is parsed whatever the status. Only a body that is
/// not an `UploadResponse` is an error here.
pub async fn upload_workbook(file: File, job_id: &str, backend_url: &str) -> AppResult<UploadResponse> {
    let form_data =
        FormData::new().map_err(|e| AppError::Upload(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|e| AppError::Upload(format!("Failed to append file: {:?}", e)))?;
    form_data
        .append_with_str("job", job_id)
        .map_err(|e| AppError::Upload(format!("Failed to append job id: {:?}", e)))?;

    let url = format!("{}/api/upload", backend_url);
    let request = Request::post(&url)
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read response: {}", e)))?;

    parse_response(status, &body)
}

/// Decode a backend body, falling back to the raw text for non-JSON errors.
fn parse_response(status: u16, body: &str) -> AppResult<UploadResponse> {
    match serde_json::from_str::<UploadResponse>(body) {
        Ok(response) => Ok(response),
        Err(_) if !(200..300).contains(&status) => {
            Err(AppError::Network(format!("Server error ({}): {}", status, body)))
        }
        Err(e) => Err(AppError::Upload(format!("Failed to parse response: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_response_deserialization() {
        let json = r#"{
            "jobId": "123e4567-e89b-12d3-a456-426614174000",
            "status": "ready",
            "error": null,
            "validationErrors": [],
            "sheets": [
                {
                    "name": "Prompts",
                    "columns": ["prompt_id", "template"],
                    "rows": [["p1", "Hi {{name}}"]],
                    "totalRows": 1
                }
            ],
            "result": {
                "columns": ["prompt_id", "model_name", "model_version", "temp", "filled_prompt"],
                "rowCount": 2,
                "rows": [["p1", "gpt", "4", "0", "Hi Alice"], ["p1", "gpt", "4", "1", "Hi Alice"]]
            },
            "downloads": {
                "csv": "prompt_id,model_name\n",
                "json": "[]"
            }
        }"#;

        let response = parse_response(200, json).unwrap();
        assert!(response.is_ready());
        assert_eq!(response.sheets[0].total_rows, 1);
        let result = response.result.unwrap();
        assert_eq!(result.row_count, 2);
        assert_eq!(result.rows[1][4], "Hi Alice");
    }

    #[test]
    fn test_invalid_response_is_not_an_error() {
        let json = r#"{
            "jobId": "x",
            "status": "invalid",
            "error": "Validation Error:\nbad",
            "validationErrors": ["bad"],
            "sheets": [],
            "result": null,
            "downloads": null
        }"#;

        let response = parse_response(422, json).unwrap();
        assert!(!response.is_ready());
        assert_eq!(response.validation_errors, vec!["bad"]);
    }

    #[test]
    fn test_non_json_error_body() {
        let err = parse_response(413, "Payload Too Large").unwrap_err();
        assert!(err.to_string().contains("413"));
    }
}
