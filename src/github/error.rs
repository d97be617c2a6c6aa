//! Tipos de erro para a consulta de status na API REST do GitHub.
//!
//! Define [`GitHubError`] com variantes para rate limiting, erros da API e
//! erros de rede, derivadas com `thiserror`.

use thiserror::Error;

/// Erros que podem ocorrer ao listar os status de um commit.
///
/// - [`RateLimited`](GitHubError::RateLimited) — HTTP 429, ou 403 com a cota esgotada
/// - [`ApiError`](GitHubError::ApiError) — qualquer outra resposta fora de 2xx
/// - [`NetworkError`](GitHubError::NetworkError) — falha de transporte ou de decodificação
#[derive(Debug, Error)]
pub enum GitHubError {
    /// O campo `retry_after_secs` vem do header `retry-after` quando presente.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Erro retornado pela API (ex.: 401 credenciais inválidas, 404 repositório inexistente).
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha do `reqwest` (DNS, conexão recusada, timeout, JSON inválido).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = GitHubError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 60s");
    }

    #[test]
    fn api_error_display() {
        let err = GitHubError::ApiError {
            status: 401,
            message: "Bad credentials".into(),
        };
        assert_eq!(err.to_string(), "API error (status 401): Bad credentials");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GitHubError>();
    }
}
