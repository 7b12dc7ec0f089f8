use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use std::path::Path;

/// Write a single-channel float texture (R32F), row-major, `width` x `height`.
pub fn write_r32f_texture(
    path: &Path,
    width: usize,
    height: usize,
    data: &[f32],
) -> Result<(), Box<dyn std::error::Error>> {
    if data.len() != width * height {
        return Err(format!(
            "texture data holds {} texels, expected {}x{}",
            data.len(),
            width,
            height
        )
        .into());
    }

    let bytes: Vec<u8> = bytemuck::cast_slice(data).to_vec();

    let params = NewDxgiParams {
        height: height as u32,
        width: width as u32,
        depth: None,
        format: DxgiFormat::R32_Float,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params)?;
    dds.data = bytes;
    dds.write(&mut std::fs::File::create(path)?)?;
    Ok(())
}
