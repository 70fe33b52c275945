use std::sync::mpsc;

use anyhow::{Context, Result};

/// Reads the bottom-left `width x height` region of `texture` (RGBA8).
///
/// Output follows the read-back contract of the backend: RGB8, bottom row first,
/// each row padded to `row_alignment` bytes, zero outside the texture.
pub(super) fn read_region(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    (tex_w, tex_h): (u32, u32),
    width: u32,
    height: u32,
    row_alignment: usize,
) -> Result<Vec<u8>> {
    let stride = (width as usize * 3).next_multiple_of(row_alignment.max(1));
    let mut out = vec![0u8; stride * height as usize];

    let copy_w = width.min(tex_w);
    let copy_h = height.min(tex_h);
    if copy_w == 0 || copy_h == 0 {
        return Ok(out);
    }

    let bytes_per_row = (copy_w * 4).next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("lumen read-back buffer"),
        size: u64::from(bytes_per_row) * u64::from(copy_h),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("lumen read-back encoder"),
    });

    // Texture rows run top-down; the bottom rows are the last `copy_h`.
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: tex_h - copy_h,
                z: 0,
            },
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: None,
            },
        },
        wgpu::Extent3d {
            width: copy_w,
            height: copy_h,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .context("device poll failed during read-back")?;
    rx.recv()
        .context("read-back map callback was dropped")?
        .context("failed to map read-back buffer")?;

    {
        let data = slice.get_mapped_range();
        repack_rgba_top_down(
            &data,
            bytes_per_row as usize,
            (copy_w as usize, copy_h as usize),
            &mut out,
            stride,
        );
    }
    staging.unmap();

    Ok(out)
}

/// Copies `copy_w x copy_h` RGBA8 pixels stored top row first into `dst` as RGB8,
/// bottom row first. Bytes past `copy_w` in each destination row are left alone.
fn repack_rgba_top_down(
    src: &[u8],
    src_stride: usize,
    (copy_w, copy_h): (usize, usize),
    dst: &mut [u8],
    dst_stride: usize,
) {
    for r in 0..copy_h {
        let src_row = &src[r * src_stride..r * src_stride + copy_w * 4];
        let dst_row = copy_h - 1 - r;
        let out = &mut dst[dst_row * dst_stride..dst_row * dst_stride + copy_w * 3];
        for (d, s) in out.chunks_exact_mut(3).zip(src_row.chunks_exact(4)) {
            d.copy_from_slice(&s[..3]);
        }
    }
}
