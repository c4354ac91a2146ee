use pradon_core::{ConfigError, CoreError, ErrorExt, RedditApiError, StoreError};
use std::time::Duration;

#[test]
fn test_retryable_errors() {
    let retryable_error =
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert!(retryable_error.is_retryable());

    let server_error = CoreError::RedditApi(RedditApiError::ServerError { status_code: 503 });
    assert!(server_error.is_retryable());

    let timeout_error = CoreError::RedditApi(RedditApiError::RequestTimeout);
    assert!(timeout_error.is_retryable());

    let non_retryable_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "CLIENT_ID".to_string(),
    });
    assert!(!non_retryable_error.is_retryable());

    let auth_error = CoreError::RedditApi(RedditApiError::AuthenticationFailed {
        reason: "bad credentials".to_string(),
    });
    assert!(!auth_error.is_retryable());
}

#[test]
fn test_retry_after() {
    let rate_limit_error =
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(
        rate_limit_error.retry_after(),
        Some(Duration::from_secs(60))
    );

    let timeout_error = CoreError::RedditApi(RedditApiError::RequestTimeout);
    assert_eq!(timeout_error.retry_after(), None);

    let store_error = CoreError::Store(StoreError::ConnectionFailed {
        reason: "locked".to_string(),
    });
    assert!(store_error.is_retryable());
    assert_eq!(store_error.retry_after(), None);
}

#[test]
fn test_error_display_includes_context() {
    let rate_limit_error =
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert!(rate_limit_error.to_string().contains("60"));

    let reply_error = CoreError::RedditApi(RedditApiError::ReplyRejected {
        reason: "RATELIMIT".to_string(),
    });
    assert!(reply_error.to_string().contains("RATELIMIT"));

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "CLIENT_ID".to_string(),
    });
    assert!(config_error.to_string().contains("CLIENT_ID"));
}

#[test]
fn test_error_conversion_through_core() {
    let api_error: CoreError = RedditApiError::InvalidToken.into();
    assert!(matches!(
        api_error,
        CoreError::RedditApi(RedditApiError::InvalidToken)
    ));

    let store_error: CoreError = StoreError::ConnectionFailed {
        reason: "no such file".to_string(),
    }
    .into();
    assert!(matches!(store_error, CoreError::Store(_)));
}
