//! Actor extraction from gateway-forwarded identity headers
//!
//! Token validation happens at the API gateway. By the time a request
//! reaches this service the gateway has resolved the session and forwards
//! the authenticated actor as `x-user-*` headers; handlers that mutate
//! state take an [`Actor`] in their signature and reject requests where
//! the identity is missing or malformed.
use actix_web::{dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::models::AuthorSnapshot;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_AVATAR_HEADER: &str = "x-user-avatar";

/// The authenticated user performing the request
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl Actor {
    /// Author snapshot to stamp onto newly created entities
    pub fn snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(actor_from_headers(req))
    }
}

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name)?.to_str().ok()
}

fn actor_from_headers(req: &HttpRequest) -> Result<Actor, Error> {
    let id = header_value(req, USER_ID_HEADER)
        .ok_or_else(|| ErrorUnauthorized("Missing identity headers"))?;
    let id = Uuid::parse_str(id).map_err(|_| ErrorUnauthorized("Invalid user id header"))?;

    let name = header_value(req, USER_NAME_HEADER)
        .ok_or_else(|| ErrorUnauthorized("Missing identity headers"))?
        .to_string();
    let email = header_value(req, USER_EMAIL_HEADER)
        .ok_or_else(|| ErrorUnauthorized("Missing identity headers"))?
        .to_string();
    let avatar = header_value(req, USER_AVATAR_HEADER).map(str::to_string);

    Ok(Actor {
        id,
        name,
        email,
        avatar,
    })
}
