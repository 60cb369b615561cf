pub mod tenant_token;
