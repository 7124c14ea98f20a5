//! Carousel gallery and checkout offers.

use serde::Serialize;

/// Sample pages scrolling in the landing carousel.
pub const CAROUSEL_IMAGES: [&str; 6] = [
    "https://i.ibb.co/ycsQ1tKn/1.jpg",
    "https://i.ibb.co/tP4rnfPG/2.jpg",
    "https://i.ibb.co/cRC1Zyr/cccb4e8da3e9d124ede6eb7a74598fdf.jpg",
    "https://i.ibb.co/cKKCYBky/3.jpg",
    "https://i.ibb.co/23sG826k/4.jpg",
    "https://i.ibb.co/Wp2hHzGX/9f4aaa89f30c76aaca49e06d08ae3423.jpg",
];

/// A product tier with its external checkout page.
///
/// Checkout is a plain redirect: no parameters are passed and no payment
/// confirmation comes back.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    pub highlights: &'static [&'static str],
    pub checkout_url: &'static str,
}

const PRODUCTS: &[Product] = &[Product {
    id: "plus",
    title: "Oferta PLUS Vitalícia",
    price: "R$ 24,90",
    highlights: &[
        "25 Desenhos Exclusivos",
        "BÔNUS: +5 Desenhos Grátis!",
        "Formato PDF pronto para Imprimir",
        "Acesso VITALÍCIO",
    ],
    checkout_url: "https://pay.kiwify.com.br/uzZIJMr",
}];

/// All product tiers.
pub fn products() -> &'static [Product] {
    PRODUCTS
}

/// Look up a product tier by id.
pub fn product_by_id(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}
