//! User-facing messages, surfaced verbatim to clients.

pub const FORM_INVALID: &str = "isi form dengan benar!";
pub const PASSWORD_MISMATCH: &str = "Password yang anda masukan salah";
pub const EMAIL_TAKEN: &str = "Email sudah pernah digunakan!";
pub const BIRTH_DATE_INVALID: &str = "Tanggal Lahir tidak sesuai.";
pub const EMAIL_NOT_FOUND: &str = "Pengguna dengan email tersebut tidak ditemukan";
pub const USER_ID_NOT_FOUND: &str = "Pengguna dengan ID tersebut tidak ditemukan";
