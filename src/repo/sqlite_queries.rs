pub const QUERY_GET_CHATWOOT_CONFIG: &str = r#"
SELECT
    chatwoot_url,chatwoot_account_id,chatwoot_token,chatwoot_inbox_id
FROM tenant
WHERE id=$1;
"#;

pub const QUERY_UPDATE_CHATWOOT_CONFIG: &str = r#"
UPDATE tenant SET
    chatwoot_url=$1,
    chatwoot_account_id=$2,
    chatwoot_token=$3,
    chatwoot_inbox_id=$4,
    updated_at=$5
WHERE id=$6;
"#;

pub const QUERY_CLEAR_CHATWOOT_CONFIG: &str = r#"
UPDATE tenant SET
    chatwoot_url='',
    chatwoot_account_id='',
    chatwoot_token='',
    chatwoot_inbox_id='',
    updated_at=$1
WHERE id=$2;
"#;

pub const QUERY_GET_TENANT_ID_BY_CHATWOOT_ACCOUNT: &str = r#"
SELECT id
FROM tenant
WHERE
    chatwoot_account_id=$1 AND
    chatwoot_token IS NOT NULL AND
    chatwoot_token<>''
ORDER BY id
LIMIT 1;
"#;

pub const QUERY_GET_TENANT_ID_BY_TOKEN: &str = r#"
SELECT id FROM tenant WHERE token=$1 LIMIT 1;
"#;

pub const QUERY_GET_TENANT_ID_BY_PHONE_NUMBER_ID: &str = r#"
SELECT id FROM tenant WHERE whatsapp_phone_number_id=$1 LIMIT 1;
"#;

pub const QUERY_GET_WHATSAPP_ACCOUNTS: &str = r#"
SELECT
    id,whatsapp_phone_number_id,whatsapp_auth_token
FROM tenant
WHERE
    whatsapp_phone_number_id IS NOT NULL AND
    whatsapp_phone_number_id<>'' AND
    whatsapp_auth_token IS NOT NULL AND
    whatsapp_auth_token<>'';
"#;
