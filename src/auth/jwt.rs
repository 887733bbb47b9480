//! JWT 令牌编解码
//! 访问令牌与刷新令牌均为无状态签名凭证，载荷携带用户邮箱身份

use crate::{config::AppConfig, error::AppError};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// 令牌载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户身份（邮箱）
    pub sub: String,
    /// 令牌类型: access 或 refresh
    pub token_type: String,
    /// 过期时间（Unix 秒）
    pub exp: i64,
    /// 签发时间（Unix 秒）
    pub iat: i64,
}

/// 登录时签发的令牌对
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 访问令牌有效期（秒）
    pub expires_in: u64,
}

/// 令牌校验错误
/// 区分失败原因，但对客户端统一呈现为认证失败
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unexpected token type")]
    WrongTokenType,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::Authentication(format!("Invalid token: {}", e))
    }
}

/// JWT 服务
/// 签名密钥在进程启动时从配置注入，之后只读
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_exp_secs: u64,
    refresh_exp_secs: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_exp_secs: u64, refresh_exp_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_exp_secs,
            refresh_exp_secs,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            config.security.jwt_secret.expose_secret(),
            config.security.access_token_exp_secs,
            config.security.refresh_token_exp_secs,
        ))
    }

    /// 为指定身份签发访问令牌 + 刷新令牌
    pub fn generate_token_pair(&self, email: &str) -> Result<TokenPair, AppError> {
        let access_token = self.issue_token(email, TOKEN_TYPE_ACCESS, self.access_exp_secs)?;
        let refresh_token = self.issue_token(email, TOKEN_TYPE_REFRESH, self.refresh_exp_secs)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_exp_secs,
        })
    }

    /// 校验访问令牌
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate(token, TOKEN_TYPE_ACCESS)
    }

    /// 校验刷新令牌
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate(token, TOKEN_TYPE_REFRESH)
    }

    /// 用刷新令牌换发新的访问令牌
    /// 刷新令牌本身不轮换、不吊销，自然过期前保持有效
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self.validate_refresh_token(refresh_token)?;
        self.issue_token(&claims.sub, TOKEN_TYPE_ACCESS, self.access_exp_secs)
    }

    fn issue_token(
        &self,
        email: &str,
        token_type: &str,
        exp_secs: u64,
    ) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            token_type: token_type.to_string(),
            exp: now + exp_secs as i64,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
    }

    fn validate(&self, token: &str, expected_type: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                other => TokenError::Malformed(format!("{:?}", other)),
            }
        })?;

        if data.claims.token_type != expected_type {
            return Err(TokenError::WrongTokenType);
        }

        Ok(data.claims)
    }
}
