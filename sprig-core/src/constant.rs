// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// Image formats decodable into a pixel grid
pub const SUPPORTED_IMAGE_FORMATS: [&str; 12] = [
    "bmp", "gif", "ico", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "qoi", "tga", "webp",
];

// Formats a label grid can be written to and read from
pub const LABEL_FORMATS: [&str; 2] = ["npy", "png"];

// Formats sprites can be written to and read from
pub const SUPPORTED_ARRAY_FORMATS: [&str; 1] = ["json"];

// The valid json keys indicating sprite values
pub const SPRITES_JSON_VALID_KEYS: [&str; 4] = ["sprites", "regions", "bounding_boxes", "boxes"];

// Canvas painted under rendered sprites when none is given (opaque white)
pub const DEFAULT_CANVAS_COLOR: [u8; 4] = [255, 255, 255, 255];

// Inclusive channel range of the per-label render colours
pub const RENDER_CHANNEL_MIN: u8 = 64;
pub const RENDER_CHANNEL_MAX: u8 = 200;
