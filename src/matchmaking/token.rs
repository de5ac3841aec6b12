use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// `{game_id, player_name}` signed under a process-wide secret.
/// Tokens carry no expiry: they stay valid until the tournament ends,
/// which the caller enforces by checking `game_id` still resolves in
/// the supervisor's registry rather than by a `exp` claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub game_id: String,
    pub player_name: String,
}

/// Signs and verifies session tokens with `jsonwebtoken`.
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionTokens {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, game_id: &str, player_name: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims { game_id: game_id.to_string(), player_name: player_name.to_string() };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verifies the signature and, when `expected_game_id` is given,
    /// rejects a token minted for a different game.
    pub fn verify(&self, token: &str, expected_game_id: Option<&str>) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        if let Some(expected) = expected_game_id {
            if claims.game_id != expected {
                return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
            }
        }
        Ok(claims)
    }
}
