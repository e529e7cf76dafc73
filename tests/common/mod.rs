//! Shared fixtures: small GIFs encoded in memory with the `gif` crate.

#![allow(dead_code)]

use std::borrow::Cow;

use gif::{DisposalMethod, Encoder, Frame};

/// Global palette: black, red, blue, green.
pub const PALETTE: [u8; 12] = [0, 0, 0, 255, 0, 0, 0, 0, 255, 0, 255, 0];

pub const BLACK: u8 = 0;
pub const RED: u8 = 1;
pub const BLUE: u8 = 2;
pub const GREEN: u8 = 3;

pub const RED_RGBA: [u8; 4] = [255, 0, 0, 255];
pub const BLUE_RGBA: [u8; 4] = [0, 0, 255, 255];
pub const GREEN_RGBA: [u8; 4] = [0, 255, 0, 255];

/// One solid-colour patch to encode.
#[derive(Debug, Clone, Copy)]
pub struct Patch {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub color: u8,
    pub dispose: DisposalMethod,
}

impl Patch {
    pub fn new(left: u16, top: u16, width: u16, height: u16, color: u8) -> Self {
        Self {
            left,
            top,
            width,
            height,
            color,
            dispose: DisposalMethod::Keep,
        }
    }

    pub fn disposing(mut self, dispose: DisposalMethod) -> Self {
        self.dispose = dispose;
        self
    }
}

/// Encode a GIF89a with the shared global palette.
pub fn encode_gif(width: u16, height: u16, patches: &[Patch]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder =
            Encoder::new(&mut bytes, width, height, &PALETTE).expect("Failed to create encoder");
        for patch in patches {
            let area = usize::from(patch.width) * usize::from(patch.height);
            let frame = Frame {
                left: patch.left,
                top: patch.top,
                width: patch.width,
                height: patch.height,
                dispose: patch.dispose,
                delay: 10,
                buffer: Cow::Owned(vec![patch.color; area]),
                ..Frame::default()
            };
            encoder.write_frame(&frame).expect("Failed to write frame");
        }
    }
    bytes
}

/// The two-frame 4×4 animation: a red background, then a blue 2×2 square
/// in the middle.
pub fn red_then_blue_square() -> Vec<u8> {
    encode_gif(
        4,
        4,
        &[Patch::new(0, 0, 4, 4, RED), Patch::new(1, 1, 2, 2, BLUE)],
    )
}
