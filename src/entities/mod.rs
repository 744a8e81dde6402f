pub mod cart;
pub mod cart_item;
pub mod collection;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod review;
pub mod user;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema, Set, TransactionTrait};
use std::sync::Arc;

use crate::entities::{
    cart::Entity as Cart, cart_item::Entity as CartItem, collection::Entity as Collection,
    customer::Entity as Customer, order::Entity as Order, order_item::Entity as OrderItem,
    product::Entity as Product, review::Entity as Review, user::Entity as User,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());

    let create_user_table = schema.create_table_from_entity(User);
    let create_customer_table = schema.create_table_from_entity(Customer);
    let create_collection_table = schema.create_table_from_entity(Collection);
    let create_product_table = schema.create_table_from_entity(Product);
    let create_review_table = schema.create_table_from_entity(Review);
    let create_cart_table = schema.create_table_from_entity(Cart);
    let create_cart_item_table = schema.create_table_from_entity(CartItem);
    let create_order_table = schema.create_table_from_entity(Order);
    let create_order_item_table = schema.create_table_from_entity(OrderItem);

    db.execute(db.get_database_backend().build(&create_user_table))
        .await
        .expect("Failed to create user schema");
    db.execute(db.get_database_backend().build(&create_customer_table))
        .await
        .expect("Failed to create customer schema");
    db.execute(db.get_database_backend().build(&create_collection_table))
        .await
        .expect("Failed to create collection schema");
    db.execute(db.get_database_backend().build(&create_product_table))
        .await
        .expect("Failed to create product schema");
    db.execute(db.get_database_backend().build(&create_review_table))
        .await
        .expect("Failed to create review schema");
    db.execute(db.get_database_backend().build(&create_cart_table))
        .await
        .expect("Failed to create cart schema");
    db.execute(db.get_database_backend().build(&create_cart_item_table))
        .await
        .expect("Failed to create cart item schema");
    db.execute(db.get_database_backend().build(&create_order_table))
        .await
        .expect("Failed to create order schema");
    db.execute(db.get_database_backend().build(&create_order_item_table))
        .await
        .expect("Failed to create order item schema");
}

/// Seeds one admin and one regular user (each with a customer profile),
/// so a fresh database is immediately usable.
pub async fn primary_setup(db: Arc<DatabaseConnection>) {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password("Secret15".as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    let new_admin = user::ActiveModel {
        username: Set("admin".to_owned()),
        password: Set(password_hash.clone()),
        role: Set(user::Role::Admin),
        ..Default::default()
    };

    let new_user = user::ActiveModel {
        username: Set("user".to_owned()),
        password: Set(password_hash),
        role: Set(user::Role::User),
        ..Default::default()
    };

    let txn = db
        .begin()
        .await
        .expect("Failed to begin primary setup transaction");

    for account in [new_admin, new_user] {
        let inserted = user::Entity::insert(account)
            .exec(&txn)
            .await
            .expect("Failed to seed users");

        let profile = customer::ActiveModel {
            user_id: Set(inserted.last_insert_id),
            phone: Set(String::new()),
            birth_date: Set(None),
            membership: Set(customer::Membership::Bronze),
            ..Default::default()
        };
        customer::Entity::insert(profile)
            .exec(&txn)
            .await
            .expect("Failed to seed customer profiles");
    }

    txn.commit()
        .await
        .expect("Failed to commit primary setup transaction");
}
