//! End-to-end binding tests: payloads and requests into derived records.

use std::collections::HashMap;

use formbind_binder::{get_file, populate, BindError, Binder};
use formbind_core::{BinderSettings, ConversionError};
use formbind_http::{FormPayload, HttpRequest, QueryDict};
use formbind_macros::FormBind;
use http::Method;
use serde::{Deserialize, Serialize};

fn payload<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> FormPayload {
    FormPayload::from_query(QueryDict::from_pairs(pairs))
}

fn bind<T: formbind_binder::FormRecord + Default>(payload: &FormPayload) -> Result<T, BindError> {
    let mut dest = T::default();
    Binder::default().populate_payload(payload, &mut dest)?;
    Ok(dest)
}

fn urlencoded_post(body: &str) -> HttpRequest {
    HttpRequest::builder()
        .method(Method::POST)
        .content_type("application/x-www-form-urlencoded")
        .body(body.as_bytes().to_vec())
        .build()
}

// ── Scalars ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicTypes {
    #[form_field("string")]
    pub string: String,
    #[form_field("int")]
    pub int: i64,
    #[form_field("int8")]
    pub int8: i8,
    #[form_field("int16")]
    pub int16: i16,
    #[form_field("int32")]
    pub int32: i32,
    #[form_field("uint")]
    pub uint: usize,
    #[form_field("uint8")]
    pub uint8: u8,
    #[form_field("uint16")]
    pub uint16: u16,
    #[form_field("uint32")]
    pub uint32: u32,
    #[form_field("uint64")]
    pub uint64: u64,
    #[form_field("float32")]
    pub float32: f32,
    #[form_field("float64")]
    pub float64: f64,
    #[form_field("bool")]
    pub flag: bool,
}

#[test]
fn test_basic_types() {
    let result: BasicTypes = bind(&payload([
        ("string", "hello"),
        ("int", "42"),
        ("int8", "-8"),
        ("int16", "16"),
        ("int32", "-32"),
        ("uint", "7"),
        ("uint8", "255"),
        ("uint16", "16"),
        ("uint32", "32"),
        ("uint64", "64"),
        ("float32", "1.5"),
        ("float64", "-2.25"),
        ("bool", "true"),
    ]))
    .unwrap();

    assert_eq!(
        result,
        BasicTypes {
            string: "hello".into(),
            int: 42,
            int8: -8,
            int16: 16,
            int32: -32,
            uint: 7,
            uint8: 255,
            uint16: 16,
            uint32: 32,
            uint64: 64,
            float32: 1.5,
            float64: -2.25,
            flag: true,
        }
    );
}

#[test]
fn test_checkbox_values() {
    for (text, expected) in [("on", true), ("1", true), ("true", true), ("false", false), ("off", false)] {
        let result: BasicTypes = bind(&payload([("bool", text)])).unwrap();
        assert_eq!(result.flag, expected, "bool={text}");
    }
}

#[test]
fn test_missing_fields_keep_defaults() {
    let result: BasicTypes = bind(&payload([("string", "only")])).unwrap();
    assert_eq!(
        result,
        BasicTypes {
            string: "only".into(),
            ..BasicTypes::default()
        }
    );
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn test_invalid_integer_names_field() {
    let err = bind::<BasicTypes>(&payload([("int", "notanumber")])).unwrap_err();
    assert!(matches!(err, BindError::Conversion { field: "int", .. }));
    assert!(err.to_string().contains("failed to set field int"));
}

#[test]
fn test_integer_out_of_range() {
    let err = bind::<BasicTypes>(&payload([("int8", "128")])).unwrap_err();
    assert_eq!(err.field(), Some("int8"));
    let err = bind::<BasicTypes>(&payload([("uint8", "-1")])).unwrap_err();
    assert_eq!(err.field(), Some("uint8"));
}

#[test]
fn test_wide_integer_bounds() {
    let result: BasicTypes = bind(&payload([
        ("uint16", "65535"),
        ("int", "-9223372036854775808"),
    ]))
    .unwrap();
    assert_eq!(result.uint16, u16::MAX);
    assert_eq!(result.int, i64::MIN);

    let err = bind::<BasicTypes>(&payload([("uint16", "65536")])).unwrap_err();
    assert_eq!(err.field(), Some("uint16"));
    let err = bind::<BasicTypes>(&payload([("int", "9223372036854775808")])).unwrap_err();
    assert_eq!(err.field(), Some("int"));
}

#[test]
fn test_unsigned_rejects_plus_sign() {
    let err = bind::<BasicTypes>(&payload([("uint16", "+5")])).unwrap_err();
    assert!(matches!(
        err,
        BindError::Conversion {
            field: "uint16",
            source: ConversionError::SignedUnsigned { .. },
        }
    ));
    let result: BasicTypes = bind(&payload([("int16", "+5")])).unwrap();
    assert_eq!(result.int16, 5);
}

#[test]
fn test_invalid_float_names_field() {
    let err = bind::<BasicTypes>(&payload([("float64", "1.2.3")])).unwrap_err();
    assert_eq!(err.field(), Some("float64"));
}

// ── Collections and optionals ───────────────────────────────────────────

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexTypes {
    #[form_field("slice")]
    pub slice: Vec<String>,
    #[form_field("intslice")]
    pub int_slice: Vec<i32>,
    #[form_field("array")]
    pub array: [String; 3],
    #[form_field("map")]
    pub map: HashMap<String, String>,
    #[form_field("mapint")]
    pub map_int: HashMap<String, i32>,
    #[form_field("ptrstr")]
    pub ptr_str: Option<String>,
    #[form_field("ptrint")]
    pub ptr_int: Option<i32>,
}

#[test]
fn test_sequences_keep_order() {
    let result: ComplexTypes = bind(&payload([
        ("slice", "a"),
        ("slice", "b"),
        ("slice", "c"),
        ("intslice", "3"),
        ("intslice", "1"),
    ]))
    .unwrap();
    assert_eq!(result.slice, vec!["a", "b", "c"]);
    assert_eq!(result.int_slice, vec![3, 1]);
}

#[test]
fn test_sequence_element_error() {
    let err = bind::<ComplexTypes>(&payload([("intslice", "1"), ("intslice", "x")])).unwrap_err();
    assert_eq!(err.field(), Some("int_slice"));
}

#[test]
fn test_array_truncates_excess_values() {
    let result: ComplexTypes = bind(&payload([
        ("array", "a"),
        ("array", "b"),
        ("array", "c"),
        ("array", "d"),
        ("array", "e"),
    ]))
    .unwrap();
    assert_eq!(result.array, ["a", "b", "c"]);
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Padded {
    #[form_field("arr")]
    pub arr: [i32; 5],
}

#[test]
fn test_array_pads_missing_values() {
    let mut request = urlencoded_post("arr=1&arr=2");
    let mut result = Padded::default();
    populate(&mut request, &mut result).unwrap();
    assert_eq!(result.arr, [1, 2, 0, 0, 0]);
}

#[test]
fn test_maps() {
    let result: ComplexTypes = bind(&payload([
        ("map", "key1:value1"),
        ("map", "key2:value2"),
        ("mapint", "a:1"),
        ("mapint", "b:2"),
    ]))
    .unwrap();
    assert_eq!(result.map.len(), 2);
    assert_eq!(result.map["key1"], "value1");
    assert_eq!(result.map["key2"], "value2");
    assert_eq!(result.map_int["b"], 2);
}

#[test]
fn test_map_skips_entries_without_colon() {
    let result: ComplexTypes = bind(&payload([("map", "invalid"), ("map", "key:value")])).unwrap();
    assert_eq!(result.map, HashMap::from([("key".to_string(), "value".to_string())]));
}

#[test]
fn test_optional_scalars() {
    let result: ComplexTypes = bind(&payload([("ptrstr", "hello"), ("ptrint", "7")])).unwrap();
    assert_eq!(result.ptr_str.as_deref(), Some("hello"));
    assert_eq!(result.ptr_int, Some(7));

    let result: ComplexTypes = bind(&payload([("slice", "x")])).unwrap();
    assert_eq!(result.ptr_str, None);
    assert_eq!(result.ptr_int, None);
}

#[test]
fn test_empty_payload_leaves_collections_empty() {
    let result: ComplexTypes = bind(&FormPayload::default()).unwrap();
    assert_eq!(result, ComplexTypes::default());
}

// ── Nested records ──────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[form_field("street")]
    pub street: String,
    #[form_field("city")]
    pub city: String,
    #[form_field("zip")]
    #[serde(rename = "zip")]
    pub zip_code: String,
}

#[derive(Debug, Default, Clone, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[form_field("phone")]
    pub phone: String,
    #[form_field("email")]
    pub email: String,
}

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[form_field("name")]
    pub name: String,
    #[form_field("age")]
    pub age: i32,
    #[form_field(flatten)]
    pub address: Address,
    #[form_field("contact")]
    pub contact: Contact,
}

#[test]
fn test_flattened_record_binds_flat_keys() {
    let result: Person = bind(&payload([
        ("name", "John Doe"),
        ("age", "30"),
        ("street", "123 Main St"),
        ("city", "New York"),
        ("zip", "10001"),
    ]))
    .unwrap();

    assert_eq!(
        result,
        Person {
            name: "John Doe".into(),
            age: 30,
            address: Address {
                street: "123 Main St".into(),
                city: "New York".into(),
                zip_code: "10001".into(),
            },
            contact: Contact::default(),
        }
    );
}

#[test]
fn test_nested_record_from_json() {
    let result: Person = bind(&payload([
        ("name", "Jane Doe"),
        ("age", "25"),
        ("contact", r#"{"phone":"555-1234","email":"jane@example.com"}"#),
    ]))
    .unwrap();

    assert_eq!(result.contact.phone, "555-1234");
    assert_eq!(result.contact.email, "jane@example.com");
}

#[test]
fn test_nested_record_from_dot_paths() {
    let result: Person = bind(&payload([
        ("name", "Bob Smith"),
        ("contact.phone", "555-5678"),
        ("contact.email", "bob@example.com"),
    ]))
    .unwrap();

    assert_eq!(
        result.contact,
        Contact {
            phone: "555-5678".into(),
            email: "bob@example.com".into(),
        }
    );
}

#[test]
fn test_invalid_json_names_field() {
    let err = bind::<Person>(&payload([("contact", "{\"invalid json}")])).unwrap_err();
    assert!(matches!(err, BindError::StructuredDecode { field: "contact", .. }));
    assert!(err.to_string().contains("failed to parse JSON for field contact"));
}

#[test]
fn test_non_json_nested_value_falls_through() {
    let result: Person = bind(&payload([("contact", "plain text")])).unwrap();
    assert_eq!(result.contact, Contact::default());
}

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
pub struct PlainContact {
    #[form_field("phone")]
    pub phone: String,
    #[form_field("email")]
    pub email: String,
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Directory {
    #[form_field("contact")]
    pub contact: PlainContact,
}

#[test]
fn test_partial_json_fills_record_without_serde_default() {
    let result: Directory = bind(&payload([("contact", r#"{"phone":"555"}"#)])).unwrap();
    assert_eq!(
        result.contact,
        PlainContact {
            phone: "555".into(),
            email: String::new(),
        }
    );
}

#[test]
fn test_json_merges_into_existing_values() {
    let mut dest = Directory {
        contact: PlainContact {
            phone: "old".into(),
            email: "kept@example.com".into(),
        },
    };
    Binder::default()
        .populate_payload(&payload([("contact", r#"{"phone":"555"}"#)]), &mut dest)
        .unwrap();
    assert_eq!(dest.contact.phone, "555");
    assert_eq!(dest.contact.email, "kept@example.com");
}

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[form_field("theme")]
    pub theme: String,
    #[form_field("lang")]
    pub lang: String,
}

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[form_field("bio")]
    pub bio: String,
    #[form_field("hobbies")]
    pub hobbies: Vec<String>,
    #[form_field("settings")]
    pub settings: Settings,
}

#[test]
fn test_json_takes_precedence_over_dot_paths() {
    let result: Profile = bind(&payload([
        ("bio", "Software developer"),
        ("hobbies", "coding"),
        ("hobbies", "reading"),
        ("hobbies", "gaming"),
        ("settings", r#"{"theme":"dark","lang":"en"}"#),
        ("settings.theme", "light"),
    ]))
    .unwrap();

    assert_eq!(result.bio, "Software developer");
    assert_eq!(result.hobbies, vec!["coding", "reading", "gaming"]);
    assert_eq!(result.settings.theme, "dark");
    assert_eq!(result.settings.lang, "en");
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Level3 {
    #[form_field("value")]
    pub value: String,
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Level2 {
    #[form_field("l3")]
    pub l3: Level3,
    #[form_field("number")]
    pub number: i32,
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Level1 {
    #[form_field("l2")]
    pub l2: Level2,
}

#[test]
fn test_deeply_nested_records() {
    let result: Level1 = bind(&payload([("l2.l3.value", "deep"), ("l2.number", "42")])).unwrap();
    assert_eq!(result.l2.l3.value, "deep");
    assert_eq!(result.l2.number, 42);
}

#[test]
fn test_nested_scalar_falls_back_to_bare_key() {
    let result: Level1 = bind(&payload([("value", "bare")])).unwrap();
    assert_eq!(result.l2.l3.value, "bare");
}

#[test]
fn test_same_key_at_different_levels() {
    #[derive(Debug, Default, FormBind, Serialize, Deserialize)]
    pub struct Inner {
        #[form_field("name")]
        pub name: String,
    }

    #[derive(Debug, Default, FormBind, Serialize, Deserialize)]
    pub struct Outer {
        #[form_field("name")]
        pub name: String,
        #[form_field("inner")]
        pub inner: Inner,
    }

    let result: Outer = bind(&payload([("name", "outer"), ("inner.name", "inner")])).unwrap();
    assert_eq!(result.name, "outer");
    assert_eq!(result.inner.name, "inner");
}

// ── Optional records ────────────────────────────────────────────────────

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Order {
    #[form_field("id")]
    pub id: u32,
    #[form_field("shipping")]
    pub shipping: Option<Address>,
}

#[test]
fn test_optional_record_allocated_from_child_key() {
    let result: Order = bind(&payload([("shipping.city", "Paris")])).unwrap();
    let shipping = result.shipping.unwrap();
    assert_eq!(shipping.city, "Paris");
    assert_eq!(shipping.street, "");
}

#[test]
fn test_optional_record_absent() {
    let result: Order = bind(&payload([("id", "9"), ("city", "Paris")])).unwrap();
    assert_eq!(result.id, 9);
    assert!(result.shipping.is_none());
}

#[test]
fn test_optional_record_allocated_from_own_key() {
    let result: Order = bind(&payload([("shipping", "yes")])).unwrap();
    assert_eq!(result.shipping, Some(Address::default()));
}

#[test]
fn test_optional_record_with_json_own_key_is_walked() {
    let result: Order = bind(&payload([("shipping", r#"{"city":"Paris"}"#)])).unwrap();
    assert_eq!(result.shipping, Some(Address::default()));
}

// ── Prefixes ────────────────────────────────────────────────────────────

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Destination {
    #[form_field("label")]
    pub label: String,
    #[form_field(flatten)]
    pub address: Address,
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Shipment {
    #[form_field("ship")]
    pub ship: Destination,
}

#[test]
fn test_flatten_inside_nested_record_uses_parent_prefix() {
    let result: Shipment = bind(&payload([
        ("ship.label", "home"),
        ("ship.street", "1 Harbour Rd"),
        ("ship.city", "Lisbon"),
    ]))
    .unwrap();
    assert_eq!(result.ship.label, "home");
    assert_eq!(result.ship.address.street, "1 Harbour Rd");
    assert_eq!(result.ship.address.city, "Lisbon");
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Counter {
    #[form_field("n")]
    pub n: Option<i32>,
    #[form_field("m")]
    pub m: i32,
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct Tally {
    #[form_field("a")]
    pub a: Counter,
}

#[test]
fn test_optional_scalar_has_no_bare_key_fallback() {
    let result: Tally = bind(&payload([("n", "5"), ("m", "6")])).unwrap();
    assert_eq!(result.a.n, None);
    assert_eq!(result.a.m, 6);

    let result: Tally = bind(&payload([("a.n", "5")])).unwrap();
    assert_eq!(result.a.n, Some(5));
}

// ── Skipped and private fields ──────────────────────────────────────────

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct WithSkipped {
    #[form_field("public")]
    pub public: String,
    #[form_field("-")]
    pub skipped: String,
    pub no_tag: String,
    #[form_field("private")]
    private: String,
}

impl WithSkipped {
    fn private(&self) -> &str {
        &self.private
    }
}

#[test]
fn test_skipped_and_private_fields_untouched() {
    let result: WithSkipped = bind(&payload([
        ("public", "visible"),
        ("skipped", "ignored"),
        ("-", "ignored"),
        ("no_tag", "ignored"),
        ("notag", "ignored"),
        ("private", "ignored"),
    ]))
    .unwrap();

    assert_eq!(result.public, "visible");
    assert_eq!(result.skipped, "");
    assert_eq!(result.no_tag, "");
    assert_eq!(result.private(), "");
}

// ── Requests ────────────────────────────────────────────────────────────

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginProfile {
    #[form_field("age")]
    pub age: i32,
    #[form_field("location")]
    pub location: String,
}

#[derive(Debug, Default, FormBind, Serialize, Deserialize)]
pub struct LoginForm {
    #[form_field("username")]
    pub username: String,
    #[form_field("password")]
    pub password: String,
    #[form_field("remember")]
    pub remember: bool,
    #[form_field("interests")]
    pub interests: Vec<String>,
    #[form_field("profile")]
    pub profile: LoginProfile,
}

#[test]
fn test_login_from_urlencoded_body() {
    let mut request = urlencoded_post(
        "username=testuser&password=secret&remember=on\
         &interests=go&interests=testing&interests=coding\
         &profile.age=25&profile.location=NYC",
    );
    let mut form = LoginForm::default();
    populate(&mut request, &mut form).unwrap();

    assert_eq!(form.username, "testuser");
    assert_eq!(form.password, "secret");
    assert!(form.remember);
    assert_eq!(form.interests, vec!["go", "testing", "coding"]);
    assert_eq!(form.profile.age, 25);
    assert_eq!(form.profile.location, "NYC");
}

#[test]
fn test_login_with_json_profile() {
    let mut request = urlencoded_post(
        "username=jsonuser&remember=true&interests=json&interests=api\
         &profile=%7B%22age%22%3A30%2C%22location%22%3A%22SF%22%7D",
    );
    let mut form = LoginForm::default();
    populate(&mut request, &mut form).unwrap();

    assert_eq!(form.username, "jsonuser");
    assert_eq!(form.interests, vec!["json", "api"]);
    assert_eq!(form.profile.age, 30);
    assert_eq!(form.profile.location, "SF");
}

#[test]
fn test_query_string_and_body_merge() {
    let mut request = HttpRequest::builder()
        .method(Method::POST)
        .query_string("interests=from-query&username=query")
        .content_type("application/x-www-form-urlencoded")
        .body(b"interests=from-body&username=body".to_vec())
        .build();
    let mut form = LoginForm::default();
    populate(&mut request, &mut form).unwrap();

    assert_eq!(form.username, "body");
    assert_eq!(form.interests, vec!["from-body", "from-query"]);
}

#[test]
fn test_populate_is_idempotent() {
    let mut request = urlencoded_post("username=alice&interests=a&interests=b");
    let mut first = LoginForm::default();
    let mut second = LoginForm::default();
    populate(&mut request, &mut first).unwrap();
    populate(&mut request, &mut second).unwrap();

    assert_eq!(first.username, second.username);
    assert_eq!(first.interests, second.interests);
}

#[test]
fn test_malformed_body() {
    let mut request = urlencoded_post("username=%zz");
    let mut form = LoginForm::default();
    let err = populate(&mut request, &mut form).unwrap_err();
    assert!(matches!(err, BindError::PayloadParse(_)));
    assert_eq!(err.status_code(), 400);
}

// ── Multipart ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, FormBind, Serialize, Deserialize)]
pub struct Upload {
    #[form_field("string")]
    pub string: String,
    #[form_field("int")]
    pub int: i32,
    #[form_field("bool")]
    pub flag: bool,
    #[form_field("slice")]
    pub slice: Vec<String>,
}

const BOUNDARY: &str = "formbind-test-boundary";

fn multipart_request() -> HttpRequest {
    let mut body = String::new();
    for (name, value) in [
        ("string", "multipart value"),
        ("int", "123"),
        ("bool", "true"),
        ("slice", "val1"),
        ("slice", "val2"),
    ] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"test.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         file content\r\n\
         --{BOUNDARY}--\r\n"
    ));

    HttpRequest::builder()
        .method(Method::POST)
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(body.into_bytes())
        .build()
}

#[test]
fn test_multipart_text_fields() {
    let mut request = multipart_request();
    let mut result = Upload::default();
    populate(&mut request, &mut result).unwrap();

    assert_eq!(
        result,
        Upload {
            string: "multipart value".into(),
            int: 123,
            flag: true,
            slice: vec!["val1".into(), "val2".into()],
        }
    );
}

#[test]
fn test_get_file() {
    let mut request = multipart_request();
    populate(&mut request, &mut Upload::default()).unwrap();

    let file = get_file(&request, "file").unwrap();
    assert_eq!(file.name, "test.txt");
    assert_eq!(file.content_type, "text/plain");
    assert_eq!(file.content, b"file content");
    assert_eq!(file.size, 12);

    assert!(matches!(
        get_file(&request, "nonexistent"),
        Err(BindError::FileNotFound(_))
    ));
}

#[test]
fn test_get_file_without_multipart() {
    let mut request = urlencoded_post("string=x");
    populate(&mut request, &mut Upload::default()).unwrap();
    let err = get_file(&request, "file").unwrap_err();
    assert!(matches!(err, BindError::NoMultipartData));
    assert_eq!(err.to_string(), "no multipart form data");
}

#[test]
fn test_multipart_memory_limit() {
    let binder = Binder::new(BinderSettings {
        max_multipart_memory: 16,
        ..BinderSettings::default()
    });
    let mut request = multipart_request();
    let err = binder.populate(&mut request, &mut Upload::default()).unwrap_err();
    assert!(err.to_string().contains("message too large"));
}

// ── Concurrency ─────────────────────────────────────────────────────────

#[test]
fn test_shared_binder_across_threads() {
    let binder = Binder::default();
    let shared = payload([("string", "s"), ("int", "5")]);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut result = Upload::default();
                binder.populate_payload(&shared, &mut result).unwrap();
                assert_eq!(result.int, 5);
            });
        }
    });
}
