//! Pipeline client tests against stubbed provider endpoints.
//!
//! Each test binds a local axum server that impersonates the hosted API
//! and points the client's `base_url` at it.

use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use talkbridge_pipeline::{
    PipelineError, SynthesizerConfig, Transcriber, TranscriberConfig, Translator,
    TranslatorConfig, VoiceMap,
};
use talkbridge_types::{Language, VoicePreference};
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn translator_for(base_url: String) -> Translator {
    Translator::new(TranslatorConfig {
        base_url,
        api_key: "test-key".to_string(),
        referer: Some("https://talkbridge.example".to_string()),
        app_title: Some("talkbridge".to_string()),
        ..Default::default()
    })
}

#[tokio::test]
async fn translate_returns_trimmed_completion() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            Json(json!({
                "choices": [ { "message": { "content": "  Xin chào  " } } ]
            }))
        }),
    );
    let translator = translator_for(serve(router).await);

    let translated = translator.translate("Hello", Language::En).await.unwrap();
    assert_eq!(translated, "Xin chào");
}

#[tokio::test]
async fn translate_always_targets_the_complement_language() {
    // The stub echoes the system instruction back as the "translation",
    // exposing which target language the client asked for.
    let router = Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<serde_json::Value>| async move {
            let instruction = body["messages"][0]["content"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            Json(json!({
                "choices": [ { "message": { "content": instruction } } ]
            }))
        }),
    );
    let translator = translator_for(serve(router).await);

    let from_en = translator.translate("Hello", Language::En).await.unwrap();
    assert!(from_en.contains("Vietnamese"));
    assert!(!from_en.contains("English"));

    let from_vi = translator.translate("Chào", Language::Vi).await.unwrap();
    assert!(from_vi.contains("English"));
    assert!(!from_vi.contains("Vietnamese"));
}

#[tokio::test]
async fn translate_surfaces_upstream_error_body() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            Json(json!({
                "error": { "message": "model overloaded" }
            }))
        }),
    );
    let translator = translator_for(serve(router).await);

    match translator.translate("Hello", Language::En).await {
        Err(PipelineError::Upstream(msg)) => assert!(msg.contains("model overloaded")),
        other => panic!("expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn translate_rejects_empty_completion() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            Json(json!({
                "choices": [ { "message": { "content": "   " } } ]
            }))
        }),
    );
    let translator = translator_for(serve(router).await);

    match translator.translate("Hello", Language::Vi).await {
        Err(PipelineError::EmptyTranslation) => {}
        other => panic!("expected EmptyTranslation, got {:?}", other),
    }
}

#[tokio::test]
async fn translate_without_api_key_fails_before_any_request() {
    let translator = Translator::new(TranslatorConfig::default());

    match translator.translate("Hello", Language::En).await {
        Err(PipelineError::Config(msg)) => assert!(msg.contains("api_key")),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[tokio::test]
async fn transcribe_blank_text_is_empty_transcript() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async { Json(json!({ "text": "   " })) }),
    );
    let transcriber = Transcriber::new(TranscriberConfig {
        base_url: serve(router).await,
        api_key: "test-key".to_string(),
        ..Default::default()
    });

    match transcriber.transcribe(vec![0u8; 16], "audio/webm").await {
        Err(PipelineError::EmptyTranscript) => {}
        other => panic!("expected EmptyTranscript, got {:?}", other),
    }
}

#[tokio::test]
async fn transcribe_returns_recognized_text() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async { Json(json!({ "text": "Hello there" })) }),
    );
    let transcriber = Transcriber::new(TranscriberConfig {
        base_url: serve(router).await,
        api_key: "test-key".to_string(),
        ..Default::default()
    });

    let text = transcriber
        .transcribe(vec![0u8; 16], "audio/webm")
        .await
        .unwrap();
    assert_eq!(text, "Hello there");
}

#[tokio::test]
async fn synthesize_data_uri_embeds_provider_audio() {
    let router = Router::new().route(
        "/text-to-speech/{voice}",
        post(|| async { b"fake-mpeg-bytes".to_vec() }),
    );
    let synthesizer = talkbridge_pipeline::Synthesizer::new(SynthesizerConfig {
        base_url: serve(router).await,
        api_key: "test-key".to_string(),
        voices: VoiceMap {
            female_vi: "vi-voice".to_string(),
            ..Default::default()
        },
        ..Default::default()
    });

    let voice = synthesizer
        .voice_for(VoicePreference::Female, Language::Vi)
        .to_string();
    assert_eq!(voice, "vi-voice");

    let uri = synthesizer
        .synthesize_data_uri("Xin chào", &voice)
        .await
        .unwrap();
    assert!(uri.starts_with("data:audio/mpeg;base64,"));
}

#[tokio::test]
async fn upstream_failure_status_is_not_retried() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/chat/completions",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (axum::http::StatusCode::BAD_GATEWAY, "upstream down")
            }
        }),
    );
    let translator = translator_for(serve(router).await);

    match translator.translate("Hello", Language::En).await {
        Err(PipelineError::Upstream(msg)) => assert!(msg.contains("502")),
        other => panic!("expected Upstream error, got {:?}", other),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
