//! Entity to read-model mapping.

use crate::dto::{UserDetail, UserView};
use sidesa_core::date_format::IndoDateFormatter;
use sidesa_core::User;
use tracing::debug;

fn birth_date(formatter: &IndoDateFormatter, user: &User) -> String {
    formatter.date(&user.tanggal_lahir).unwrap_or_else(|e| {
        debug!("Unformattable birth date for user {}: {}", user.id, e);
        String::new()
    })
}

/// Maps a listing to views numbered from 1 in the given order.
#[must_use]
pub fn to_user_views(formatter: &IndoDateFormatter, users: Vec<User>) -> Vec<UserView> {
    users
        .into_iter()
        .enumerate()
        .map(|(i, user)| to_user_view(formatter, i + 1, user))
        .collect()
}

/// Maps one user to a listing row.
#[must_use]
pub fn to_user_view(formatter: &IndoDateFormatter, index: usize, user: User) -> UserView {
    UserView {
        index,
        id: user.id,
        tanggal_lahir: birth_date(formatter, &user),
        profile_file: user.profile_file_or_default().to_string(),
        created_at: formatter.datetime(user.created_at),
        updated_at: formatter.datetime(user.updated_at),
        deleted_at: user
            .deleted_at
            .map(|at| formatter.datetime(at))
            .unwrap_or_default(),
        nama: user.nama,
        email: user.email,
        no_hp: user.no_hp,
        role: user.role,
    }
}

/// Maps a user to the by-id read model.
#[must_use]
pub fn to_user_detail(formatter: &IndoDateFormatter, user: User) -> UserDetail {
    UserDetail {
        id: user.id,
        tanggal_lahir: birth_date(formatter, &user),
        profile_file: user.profile_file_or_default().to_string(),
        created_at: user.created_at,
        updated_at: user.updated_at,
        deleted_at: user.deleted_at,
        nama: user.nama,
        email: user.email,
        no_hp: user.no_hp,
        role: user.role,
    }
}
