use futures::future::{Either, ready};
use ntex::{http::Payload, web};

use crate::{
    consts, repo,
    server::{AppState, errors},
};

/// Tenant authenticated by the api token sent in the `token` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedTenant {
    pub tenant_id: i64,
}

fn header_token(req: &web::HttpRequest) -> Option<String> {
    req.headers()
        .get(consts::TENANT_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

async fn authenticate(
    repo: repo::ImplTenantRepo,
    token: String,
) -> Result<AuthenticatedTenant, web::Error> {
    let tenant_id = repo
        .find_tenant_by_token(&token)
        .await
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!(
                "function find_tenant_by_token raised an error: {e}"
            ))
        })?
        .ok_or(errors::UserError::Unauthorized)?;

    Ok(AuthenticatedTenant { tenant_id })
}

impl<Err> web::FromRequest<Err> for AuthenticatedTenant {
    type Error = web::Error;

    fn from_request(
        req: &web::HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let Some(token) = header_token(req) else {
            let err: web::Error = errors::UserError::Unauthorized.into();
            return Either::Left(ready(Err(err)));
        };

        match req.app_state::<AppState>() {
            Some(app_state) => Either::Right(authenticate(app_state.repo.clone(), token)),
            None => {
                let err: web::Error =
                    errors::ServerError::InternalServerError("AppState is not registered".into())
                        .into();
                Either::Left(ready(Err(err)))
            }
        }
    }
}
