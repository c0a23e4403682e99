//
// font: Convert the 8x8 bitmap font png into a Verilog ROM literal.
//
// The image holds 128 glyphs side by side, glyph i in columns
// i*8..i*8+8. Lit pixels are stored as 0 bits, so the core can AND the
// glyph row straight into the background.
//

use std::io::{Read, Write};

use crate::{Error, Result};

pub const GLYPHS: usize = 128;
pub const GLYPH_SIZE: usize = 8;

/// A decoded font image, reduced to one "lit" flag per pixel.
pub struct FontImage {
    width: usize,
    height: usize,
    lit: Vec<bool>,
}

impl FontImage {
    pub fn decode<R: Read>(r: R) -> Result<Self> {
        let mut decoder = png::Decoder::new(r);
        // Palette and sub-byte greyscale come out as whole bytes.
        decoder.set_transformations(png::Transformations::EXPAND);
        let mut reader = decoder.read_info()?;
        // Allocate the output buffer.
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;

        let (colour, alpha) = match info.color_type {
            png::ColorType::Grayscale => (1, 0),
            png::ColorType::GrayscaleAlpha => (1, 1),
            png::ColorType::Rgb => (3, 0),
            png::ColorType::Rgba => (3, 1),
            png::ColorType::Indexed => {
                return Err(Error::FontImage("palette was not expanded".to_string()))
            }
        };
        let bytes_per_sample = match info.bit_depth {
            png::BitDepth::Sixteen => 2,
            _ => 1,
        };
        let stride = (colour + alpha) * bytes_per_sample;

        let w = info.width as usize;
        let h = info.height as usize;
        let mut lit = Vec::with_capacity(w * h);
        for y in 0..h {
            let row = &buf[y * info.line_size..];
            for x in 0..w {
                let px = &row[x * stride..x * stride + colour * bytes_per_sample];
                lit.push(px.iter().any(|&b| b != 0));
            }
        }

        Ok(FontImage {
            width: w,
            height: h,
            lit,
        })
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.lit[y * self.width + x]
    }

    fn check_size(&self) -> Result<()> {
        if self.width < GLYPHS * GLYPH_SIZE || self.height < GLYPH_SIZE {
            return Err(Error::FontImage(format!(
                "{}x{} is too small, need at least {}x{}",
                self.width,
                self.height,
                GLYPHS * GLYPH_SIZE,
                GLYPH_SIZE
            )));
        }
        Ok(())
    }

    /// One glyph row as a Verilog binary literal, column 7 first.
    fn row_literal(&self, glyph: usize, row: usize) -> String {
        let mut bits = String::from("8'b");
        for k in (0..GLYPH_SIZE).rev() {
            bits.push(if self.is_lit(glyph * GLYPH_SIZE + k, row) {
                '0'
            } else {
                '1'
            });
        }
        bits
    }

    /// Emit the `fontmem` localparam and its `font` lookup function.
    /// Glyphs run from 127 down to 0 and rows from 7 down to 0, so bit
    /// `{c, y, x}` of the literal is pixel x of row y of glyph c.
    pub fn write_verilog<W: Write>(&self, out: &mut W, verbose: bool) -> Result<()> {
        self.check_size()?;

        writeln!(
            out,
            "localparam [{}:0] fontmem = {{",
            GLYPHS * GLYPH_SIZE * GLYPH_SIZE - 1
        )?;

        for i in (0..GLYPHS).rev() {
            if i != GLYPHS - 1 {
                writeln!(out)?;
            }
            if verbose {
                if (32..127).contains(&i) {
                    writeln!(out, "\t// '{}'", i as u8 as char)?;
                } else {
                    writeln!(out, "\t// {}", i)?;
                }
            }
            for j in (0..GLYPH_SIZE).rev() {
                let lead = if verbose || j == GLYPH_SIZE - 1 { "\t" } else { " " };
                let sep = if i != 0 || j != 0 { "," } else { "" };
                let bits = self.row_literal(i, j);
                if verbose {
                    writeln!(out, "{}{}{}", lead, bits, sep)?;
                } else {
                    write!(out, "{}{}{}", lead, bits, sep)?;
                }
            }
        }

        if verbose {
            writeln!(out, "}};")?;
        } else {
            writeln!(out, "\n}};")?;
        }

        writeln!(
            out,
            "function font(input [7:0] c, input [2:0] x, input [2:0] y);"
        )?;
        writeln!(out, "\tfont = fontmem[{{c, y, x}}];")?;
        writeln!(out, "endfunction")?;
        Ok(())
    }
}
