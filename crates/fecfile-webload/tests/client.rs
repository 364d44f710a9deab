//! Integration tests for the webload client.
//!
//! These tests run the client against a local mock HTTP server.

#![allow(clippy::unwrap_used)]

use fecfile_webload::{ClientConfig, Error, WebloadClient, WebloadService};
use mockito::{Matcher, Server};

const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

fn reply(operation: &str, data: &str) -> String {
    format!(
        "<?xml version=\"1.0\" ?><S:Envelope xmlns:S=\"{ENVELOPE_NS}\"><S:Body>\
         <ns2:{operation} xmlns:ns2=\"http://service.webload.efo.fec.gov/\">{data}</ns2:{operation}>\
         </S:Body></S:Envelope>"
    )
}

fn client_for(server: &Server) -> WebloadClient {
    let config = ClientConfig::new(format!("{}/webload/services/upload", server.url())).unwrap();
    WebloadClient::new(config).unwrap()
}

#[tokio::test]
async fn test_upload_sends_metadata_and_base64_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/webload/services/upload")
        .match_header("content-type", "text/xml; charset=utf-8")
        .match_header("soapaction", "\"\"")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("<ns:upload xmlns:ns=\"http://service.webload.efo.fec.gov/\">".to_string()),
            Matcher::Regex("<arg0>\\{&quot;CommitteeId&quot;:&quot;C00000001&quot;\\}</arg0>".to_string()),
            Matcher::Regex("<arg1>SERSLEZFQ1BTfDguNA==</arg1>".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=utf-8")
        .with_body(reply(
            "uploadResponse",
            "<return>{\"Status\":\"Processing\",\"SubmissionId\":\"FEC-1\"}</return>",
        ))
        .create_async()
        .await;

    let client = client_for(&server);
    let json = client
        .upload("{\"CommitteeId\":\"C00000001\"}", b"HDR,FECPS|8.4")
        .await
        .unwrap();

    assert_eq!(json, "{\"Status\":\"Processing\",\"SubmissionId\":\"FEC-1\"}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_decodes_mtom_reply() {
    let mut server = Server::new_async().await;
    let attachment = "{\"Status\":\"Accepted\",\"ReportId\":\"R123\"}";
    let root = reply(
        "statusResponse",
        "<return><xop:Include xmlns:xop=\"http://www.w3.org/2004/08/xop/include\" \
         href=\"cid:att-1@example.com\"/></return>",
    );
    let body = format!(
        "--uuid:b1\r\n\
         Content-Type: application/xop+xml; charset=UTF-8; type=\"text/xml\"\r\n\
         Content-Transfer-Encoding: binary\r\n\
         Content-ID: <root.message@cxf.apache.org>\r\n\r\n\
         {root}\r\n\
         --uuid:b1\r\n\
         Content-Type: application/octet-stream\r\n\
         Content-Transfer-Encoding: binary\r\n\
         Content-ID: <att-1@example.com>\r\n\r\n\
         {attachment}\r\n\
         --uuid:b1--\r\n"
    );
    let mock = server
        .mock("POST", "/webload/services/upload")
        .match_body(Matcher::Regex("<arg0>FEC-1</arg0>".to_string()))
        .with_status(200)
        .with_header(
            "content-type",
            "multipart/related; type=\"application/xop+xml\"; boundary=\"uuid:b1\"; \
             start=\"<root.message@cxf.apache.org>\"; start-info=\"text/xml\"",
        )
        .with_body(body)
        .create_async()
        .await;

    let json = client_for(&server).status("FEC-1").await.unwrap();

    // The include is replaced by the base64 text of the attachment.
    assert_eq!(json, "eyJTdGF0dXMiOiJBY2NlcHRlZCIsIlJlcG9ydElkIjoiUjEyMyJ9");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fault_is_reported() {
    let mut server = Server::new_async().await;
    let fault = format!(
        "<S:Envelope xmlns:S=\"{ENVELOPE_NS}\"><S:Body><S:Fault>\
         <faultcode>S:Server</faultcode><faultstring>Invalid password</faultstring>\
         </S:Fault></S:Body></S:Envelope>"
    );
    server
        .mock("POST", "/webload/services/upload")
        .with_status(500)
        .with_header("content-type", "text/xml;charset=UTF-8")
        .with_body(fault)
        .create_async()
        .await;

    let err = client_for(&server).status("FEC-1").await.unwrap_err();
    let Error::Fault(fault) = err else {
        panic!("expected fault, got {err:?}");
    };
    assert_eq!(fault.code, "S:Server");
    assert_eq!(fault.message, "Invalid password");
}

#[tokio::test]
async fn test_non_soap_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/webload/services/upload")
        .with_status(503)
        .with_header("content-type", "text/html")
        .with_body("<html>Service Unavailable</html>")
        .create_async()
        .await;

    let err = client_for(&server).status("FEC-1").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, ref body } if body.contains("Unavailable")));
}

#[tokio::test]
async fn test_unsupported_content_type_on_success() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/webload/services/upload")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let err = client_for(&server).status("FEC-1").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Mime(fecfile_mime::Error::UnsupportedContentType(_))
    ));
}

#[tokio::test]
async fn test_missing_return_is_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/webload/services/upload")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(reply("statusResponse", ""))
        .create_async()
        .await;

    let json = client_for(&server).status("FEC-1").await.unwrap();
    assert!(json.is_empty());
}

#[tokio::test]
async fn test_mismatched_operation() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/webload/services/upload")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(reply("uploadResponse", "<return>{}</return>"))
        .create_async()
        .await;

    let err = client_for(&server).status("FEC-1").await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
}
