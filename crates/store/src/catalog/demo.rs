//! Built-in demonstration products.

use shopcart_core::{Price, Product, ProductId};

struct Entry {
    id: &'static str,
    title: &'static str,
    price: &'static str,
    category: &'static str,
    sku: &'static str,
    tags: &'static [&'static str],
    images: &'static [&'static str],
    description: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "1",
        title: "HAVIT HV-G92 Gamepad",
        price: "120",
        category: "Gaming",
        sku: "GP-HV-G92",
        tags: &["Gaming", "Controller", "Electronics"],
        images: &[
            "./image/items/item-1.png",
            "./image/items/item-2.png",
            "./image/items/item-3.png",
        ],
        description: "Experience gaming like never before with the HAVIT HV-G92 Gamepad. \
            This premium controller features ergonomic design, responsive buttons, and \
            precision control for an immersive gaming experience. Compatible with multiple \
            platforms including PC, PlayStation, and mobile devices.",
    },
    Entry {
        id: "2",
        title: "AK-900 Wired Keyboard",
        price: "80",
        category: "Computer Accessories",
        sku: "KB-AK-900",
        tags: &["Keyboard", "Gaming", "Electronics"],
        images: &[
            "./image/items/item-2.png",
            "./image/items/item-3.png",
            "./image/items/item-4.png",
        ],
        description: "The AK-900 Wired Keyboard offers a premium typing experience with \
            mechanical switches, customizable RGB lighting, and a durable aluminum frame. \
            Perfect for gaming and professional use with programmable macros and \
            anti-ghosting technology.",
    },
    Entry {
        id: "3",
        title: "IPS LCD Gaming Monitor",
        price: "370",
        category: "Monitors",
        sku: "MN-IPS-27",
        tags: &["Monitor", "Gaming", "Electronics"],
        images: &[
            "./image/items/item-3.png",
            "./image/items/item-4.png",
            "./image/items/item-5.png",
        ],
        description: "Immerse yourself in stunning visuals with our IPS LCD Gaming Monitor. \
            Featuring a high refresh rate, ultra-low response time, and HDR support, this \
            monitor delivers exceptional color accuracy and smooth gameplay. The adjustable \
            stand and anti-glare screen ensure comfort during extended gaming sessions.",
    },
    Entry {
        id: "4",
        title: "S-Series Comfort Chair",
        price: "120",
        category: "Furniture",
        sku: "CH-S-COMFORT",
        tags: &["Chair", "Office", "Furniture"],
        images: &[
            "./image/items/item-4.png",
            "./image/items/item-5.png",
            "./image/items/item-6.png",
        ],
        description: "The S-Series Comfort Chair provides exceptional comfort and support for \
            long hours of sitting. With ergonomic design, adjustable height, and premium \
            materials, this chair is perfect for home offices and gaming setups.",
    },
    Entry {
        id: "5",
        title: "The North Coat",
        price: "120",
        category: "Clothing",
        sku: "CL-NORTH-COAT",
        tags: &["Coat", "Winter", "Fashion"],
        images: &[
            "./image/items/item-5.png",
            "./image/items/item-6.png",
            "./image/items/item-7.png",
        ],
        description: "Stay warm and stylish with The North Coat. This premium winter coat \
            features water-resistant material, thermal insulation, and a modern design that \
            looks great in any setting.",
    },
    Entry {
        id: "6",
        title: "RGB Liquid CPU Cooler",
        price: "160",
        category: "Computer Accessories",
        sku: "CL-RGB-240",
        tags: &["Cooler", "PC", "Electronics"],
        images: &["./image/items/item-6.png"],
        description: "Keep your CPU cool with the RGB Liquid CPU Cooler.",
    },
    Entry {
        id: "7",
        title: "Gucci Duffle Bag",
        price: "960",
        category: "Fashion",
        sku: "BG-GUCCI-DUF",
        tags: &["Bag", "Travel", "Fashion"],
        images: &["./image/items/item-7.png"],
        description: "Carry your essentials in style with the Gucci Duffle Bag.",
    },
    Entry {
        id: "8",
        title: "Small BookShelf",
        price: "360",
        category: "Furniture",
        sku: "FN-BOOKSHELF-S",
        tags: &["Shelf", "Home", "Furniture"],
        images: &["./image/items/item-8.png"],
        description: "Organize your books with our Small BookShelf.",
    },
];

pub(super) fn products() -> Vec<Product> {
    ENTRIES
        .iter()
        .map(|entry| Product {
            id: ProductId::new(entry.id),
            title: entry.title.to_owned(),
            price: Price::new(entry.price),
            category: entry.category.to_owned(),
            image: entry.images.first().map(|image| (*image).to_owned()),
            images: entry.images.iter().map(|image| (*image).to_owned()).collect(),
            description: entry.description.to_owned(),
            sku: Some(entry.sku.to_owned()),
            tags: entry.tags.iter().map(|tag| (*tag).to_owned()).collect(),
        })
        .collect()
}
